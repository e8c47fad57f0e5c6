//! This module abstracts the git operations crosspick performs. Each subcommand is a small
//! builder implementing [`GitCmd`], and is executed inside a [`Repo`].

use std::path::PathBuf;
use std::time::Duration;

use ::log::debug;
use thiserror::Error;
use tokio::process::Command;

use crate::shell::{self, Line, Output, Streamed};

mod branch;
mod checkout;
mod cherry_pick;
mod config;
mod diff;
mod fetch;
mod log;
mod push;
mod remote;
mod rev_parse;
mod status;
mod switch;

pub use branch::branch;
pub use checkout::checkout;
pub use cherry_pick::cherry_pick;
pub use config::config_matching;
pub use diff::diff;
pub use fetch::fetch;
pub use self::log::log;
pub use push::push;
pub use remote::remote;
pub use rev_parse::rev_parse;
pub use status::{status, Style as StatusStyle};
pub use switch::switch;

pub struct Branch<T: Into<String>>(pub T);
pub struct Remote<T: Into<String>>(pub T);
pub struct Commit<T: Into<String>>(pub T);

pub enum Format {
    /// `<short hash> <subject>`
    Oneline,
    /// `<author date, ISO 8601>|<author name>|<subject>|<full hash>`
    Record,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Oneline => "%h %s",
            Format::Record => "%aI|%an|%s|%H",
        }
    }
}

/// A git invocation that could not run or exited with a non-zero code.
#[derive(Debug, Error)]
#[error("`git {step}` failed: {source}")]
pub struct Error {
    pub step: &'static str,
    #[source]
    pub source: shell::Error,
}

impl Error {
    pub fn timed_out(&self) -> Option<Duration> {
        match self.source {
            shell::Error::TimedOut(after) => Some(after),
            _ => None,
        }
    }
}

pub trait GitCmd: Sized {
    fn setup(self, cmd: &mut Command);

    /// Short name used in diagnostics, e.g. `fetch` or `cherry-pick`
    fn step(&self) -> &'static str;
}

/// A working tree on which git commands are run. Every command gets `-C <dir>`, so nothing
/// depends on the process' current directory.
#[derive(Debug, Clone)]
pub struct Repo {
    dir: PathBuf,
    timeout: Option<Duration>,
}

impl Repo {
    pub fn open(dir: impl Into<PathBuf>) -> Repo {
        Repo {
            dir: dir.into(),
            timeout: None,
        }
    }

    /// Bound every git invocation by `timeout`. `None` waits forever.
    pub fn timeout(self, timeout: Option<Duration>) -> Repo {
        Repo { timeout, ..self }
    }

    fn command<C: GitCmd>(&self, to_run: C) -> Command {
        let mut cmd = Command::new("git");

        cmd.arg("-C").arg(&self.dir);
        // never block on a credential prompt nobody can see
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        to_run.setup(&mut cmd);

        debug!("{:?}", cmd.as_std().get_args().collect::<Vec<_>>());

        cmd
    }

    /// Run `to_run`, failing on a non-zero exit code.
    pub async fn run<C: GitCmd>(&self, to_run: C) -> Result<Output, Error> {
        let step = to_run.step();

        shell::run(self.command(to_run), self.timeout)
            .await
            .map_err(|source| Error { step, source })
    }

    /// Run `to_run` and return its output, whatever the exit code.
    pub async fn output<C: GitCmd>(&self, to_run: C) -> Result<Output, Error> {
        let step = to_run.step();

        shell::output(self.command(to_run), self.timeout)
            .await
            .map_err(|source| Error { step, source })
    }

    /// Run `to_run`, handing each line of output to `on_line` while the process is alive.
    pub async fn stream<C, F>(&self, to_run: C, on_line: F) -> Result<Streamed, Error>
    where
        C: GitCmd,
        F: FnMut(Line),
    {
        let step = to_run.step();

        shell::stream(self.command(to_run), self.timeout, on_line)
            .await
            .map_err(|source| Error { step, source })
    }
}
