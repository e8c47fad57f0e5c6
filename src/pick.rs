//! Applying the selected commit and telling a clean pick from a conflict or a hard failure.

use std::collections::BTreeSet;

use log::{info, warn};

use crate::error::Result;
use crate::git::{self, Repo, StatusStyle};
use crate::shell::{Line, Streamed};

// XY codes of unmerged paths in `git status --porcelain`
const UNMERGED: [&str; 7] = ["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

// stderr lines kept in a failure reason
const REASON_LINES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CherryPickResult {
    Applied,
    /// Paths git left with conflict markers, to be resolved by hand
    Conflicted(BTreeSet<String>),
    Failed(String),
}

/// Live output of the cherry-pick, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Stdout(String),
    Stderr(String),
    /// `git status --short`, produced once per pick when git complained on stderr. It is taken
    /// after the pick exits rather than on the first stderr line, since two git processes must
    /// never share the work tree.
    Status(String),
}

/// Decode `git status --porcelain -z` into the set of unmerged paths.
pub fn parse_unmerged(porcelain: &str) -> BTreeSet<String> {
    let mut entries = porcelain.split('\0').filter(|entry| !entry.is_empty());
    let mut unmerged = BTreeSet::new();

    while let Some(entry) = entries.next() {
        let (Some(code), Some(path)) = (entry.get(..2), entry.get(3..)) else {
            continue;
        };

        // renames and copies are followed by an entry holding the original path
        if code.contains(['R', 'C']) {
            entries.next();
        }

        if UNMERGED.contains(&code) {
            unmerged.insert(path.to_owned());
        }
    }

    unmerged
}

/// Outcome of a cherry-pick given its exit status and the unmerged paths found after it.
pub fn classify(
    success: bool,
    unmerged: BTreeSet<String>,
    reason: impl FnOnce() -> String,
) -> CherryPickResult {
    if success {
        CherryPickResult::Applied
    } else if !unmerged.is_empty() {
        CherryPickResult::Conflicted(unmerged)
    } else {
        CherryPickResult::Failed(reason())
    }
}

fn failure_reason(streamed: &Streamed) -> String {
    let lines = streamed
        .stderr
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>();

    if lines.is_empty() {
        format!("git cherry-pick exited with {}", streamed.status)
    } else {
        lines[lines.len().saturating_sub(REASON_LINES)..].join("\n")
    }
}

pub struct CherryPick<'r> {
    repo: &'r Repo,
}

impl<'r> CherryPick<'r> {
    pub fn new(repo: &'r Repo) -> CherryPick<'r> {
        CherryPick { repo }
    }

    /// Cherry-pick `commit` onto the current branch. Conflicts are left in the working tree;
    /// nothing here continues or aborts the pick.
    pub async fn apply<F>(&self, commit: &str, mut progress: F) -> Result<CherryPickResult>
    where
        F: FnMut(Progress),
    {
        info!("cherry-picking {commit}...");

        let mut complained = false;
        let streamed = self
            .repo
            .stream(git::cherry_pick(git::Commit(commit)), |line| match line {
                Line::Stdout(line) => progress(Progress::Stdout(line)),
                Line::Stderr(line) => {
                    complained = true;
                    progress(Progress::Stderr(line));
                }
            })
            .await?;

        // waits for the pick to exit: two git processes must never share the work tree
        if complained {
            self.dump_status(&mut progress).await;
        }

        if streamed.status.success() {
            return Ok(CherryPickResult::Applied);
        }

        let porcelain = self.repo.run(git::status(StatusStyle::Porcelain)).await?;
        let result = classify(false, parse_unmerged(&porcelain.stdout), || {
            failure_reason(&streamed)
        });

        match &result {
            CherryPickResult::Conflicted(files) => {
                warn!("cherry-pick of {commit} conflicts in {} file(s)", files.len())
            }
            CherryPickResult::Failed(reason) => warn!("cherry-pick of {commit} failed: {reason}"),
            CherryPickResult::Applied => {}
        }

        Ok(result)
    }

    async fn dump_status<F: FnMut(Progress)>(&self, progress: &mut F) {
        match self.repo.output(git::status(StatusStyle::Short)).await {
            Ok(out) => progress(Progress::Status(out.stdout)),
            Err(e) => warn!("could not read repository status: {e}"),
        }
    }
}
