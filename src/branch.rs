//! Local branch management: the disposable `temp-*` staging branch and the target branch the
//! commit lands on.

use log::{info, warn};

use crate::error::{Error, Result};
use crate::git::{self, Repo};
use crate::remote::ORIGIN;

pub const TEMP_PREFIX: &str = "temp-";

/// Name of the branch staging `source_branch`: always `temp-<source_branch>`.
pub fn temp_branch_name(source_branch: &str) -> String {
    format!("{TEMP_PREFIX}{source_branch}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub exists: bool,
    pub is_temporary: bool,
}

/// How [`Branches::ensure_target`] got onto the target branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTransition {
    /// The branch existed locally, it was only switched to
    Switched,
    /// The branch was created from HEAD and pushed to `origin` with upstream tracking
    CreatedAndPublished,
}

pub struct Branches<'r> {
    repo: &'r Repo,
}

impl<'r> Branches<'r> {
    pub fn new(repo: &'r Repo) -> Branches<'r> {
        Branches { repo }
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        let out = self.repo.run(git::branch().list(name)).await?;

        Ok(!out.stdout.trim().is_empty())
    }

    /// The checked out branch, or `None` on a detached HEAD
    pub async fn current(&self) -> Result<Option<String>> {
        let out = self.repo.run(git::branch().show_current()).await?;
        let current = out.stdout.trim();

        Ok((!current.is_empty()).then(|| current.to_owned()))
    }

    /// (Re)create `name` at `from_ref` and check it out. A leftover branch of the same name is
    /// force-deleted first; if that fails, nothing else happens.
    pub async fn create_temporary(&self, name: &str, from_ref: &str) -> Result<BranchRef> {
        if self.exists(name).await? {
            info!("deleting stale branch `{name}`...");

            // git refuses to delete the checked out branch
            if self.current().await?.as_deref() == Some(name) {
                self.repo
                    .run(git::checkout().detach().start_point(from_ref))
                    .await?;
            }

            self.repo
                .run(git::branch().force_delete(name))
                .await
                .map_err(|source| {
                    Error::or_timeout(source, |source| Error::BranchCleanupFailed {
                        branch: name.to_owned(),
                        source,
                    })
                })?;
        }

        info!("creating `{name}` from `{from_ref}`");
        self.repo
            .run(git::checkout().new_branch(name).start_point(from_ref))
            .await?;

        Ok(BranchRef {
            name: name.to_owned(),
            exists: true,
            is_temporary: name.starts_with(TEMP_PREFIX),
        })
    }

    /// Get onto `name`. A branch that doesn't exist yet is created from HEAD and published to
    /// `origin` right away, before anything is applied to it.
    pub async fn ensure_target(&self, name: &str) -> Result<(BranchRef, TargetTransition)> {
        let transition = if self.exists(name).await? {
            info!("switching to `{name}`");
            self.repo.run(git::switch(name)).await?;

            TargetTransition::Switched
        } else {
            info!("creating `{name}` and publishing it to `{ORIGIN}`");
            self.repo.run(git::checkout().new_branch(name)).await?;
            self.repo
                .run(
                    git::push()
                        .upstream(git::Remote(ORIGIN))
                        .branch(git::Branch(name)),
                )
                .await?;

            TargetTransition::CreatedAndPublished
        };

        let branch = BranchRef {
            name: name.to_owned(),
            exists: true,
            is_temporary: false,
        };

        Ok((branch, transition))
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.repo.run(git::branch().force_delete(name)).await?;

        Ok(())
    }

    /// Delete `name`, only logging a failure
    pub async fn discard(&self, name: &str) {
        match self.delete(name).await {
            Ok(()) => info!("deleted `{name}`"),
            Err(e) => warn!("could not delete `{name}`, remove it by hand: {e}"),
        }
    }
}
