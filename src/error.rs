use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config;
use crate::git;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that aborts a crosspick run. A conflicting or failed cherry-pick is not in here:
/// those are outcomes of the run, see [`crate::RunStatus`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "invalid repository URL `{0}`: expected `user@host:org/repo.git` or `https://host/org/repo.git`"
    )]
    InvalidUrlFormat(String),
    #[error("could not register remote `{name}` for `{url}`: {source}")]
    RemoteRegistrationFailed {
        name: String,
        url: String,
        #[source]
        source: git::Error,
    },
    #[error("could not fetch branch `{branch}`: {source}")]
    FetchFailed {
        branch: String,
        #[source]
        source: git::Error,
    },
    #[error("could not parse commit history line `{line}`: {reason}")]
    HistoryParseError { line: String, reason: String },
    #[error("could not delete stale branch `{branch}`: {source}")]
    BranchCleanupFailed {
        branch: String,
        #[source]
        source: git::Error,
    },
    #[error("`git {step}` timed out after {after:?}")]
    OperationTimedOut { step: &'static str, after: Duration },
    #[error("another crosspick run is using this repository (lock held at `{}`)", .0.display())]
    RepositoryLocked(PathBuf),
    #[error("configuration error: {0}")]
    Config(#[from] config::Error),
    #[error(transparent)]
    Git(git::Error),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The user interrupted the run, e.g. with Ctrl-C at a prompt
    #[error("interrupted")]
    Interrupted,
}

impl Error {
    /// Wrap a failed git step with `otherwise`, unless it failed by running out of time.
    pub(crate) fn or_timeout(
        source: git::Error,
        otherwise: impl FnOnce(git::Error) -> Error,
    ) -> Error {
        match source.timed_out() {
            Some(after) => Error::OperationTimedOut {
                step: source.step,
                after,
            },
            None => otherwise(source),
        }
    }
}

impl From<git::Error> for Error {
    fn from(source: git::Error) -> Error {
        Error::or_timeout(source, Error::Git)
    }
}
