//! Terminal prompts for whatever the command line and config file left out.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Select};

use crosspick::history::CommitRecord;
use crosspick::remote;

// a rejected answer is asked again, this many times at most
const ATTEMPTS: usize = 3;

pub fn text(prompt: &str) -> Result<String> {
    Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
}

pub fn url() -> Result<String> {
    for _ in 0..ATTEMPTS {
        let url = text("Source repository URL")?;

        match remote::normalize_url(&url) {
            Ok(_) => return Ok(url),
            Err(e) => eprintln!("{e}"),
        }
    }

    bail!("no valid repository URL given after {ATTEMPTS} attempts")
}

/// Let the user pick one of `commits`, returning its hash.
pub fn commit(commits: &[CommitRecord]) -> Result<String> {
    if commits.is_empty() {
        bail!("the source branch has no commits to pick from");
    }

    let items = commits
        .iter()
        .map(|c| {
            format!(
                "{} {} {}: {}",
                &c.hash[..c.hash.len().min(10)],
                c.date.format("%Y-%m-%d"),
                c.author,
                c.subject
            )
        })
        .collect::<Vec<_>>();

    let chosen = Select::new()
        .with_prompt("Commit to cherry-pick")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(commits[chosen].hash.clone())
}

pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
