use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::git::{self, Repo};

const LOCK_FILE: &str = "crosspick.lock";

/// Exclusive hold on a repository for the duration of a run, released on drop.
///
/// The lock file itself is never removed: a run that opened it just before the release must
/// keep contending on the same inode as every later run.
#[derive(Debug)]
pub struct RepoLock {
    file: File,
    path: PathBuf,
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        match self.file.unlock() {
            Ok(()) => debug!("unlocked `{}`", self.path.display()),
            Err(e) => warn!("could not unlock `{}`: {e}", self.path.display()),
        }
    }
}

/// Take the lock at `path` without waiting.
pub fn acquire_at(path: &Path) -> Result<RepoLock> {
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;

    match file.try_lock_exclusive() {
        Ok(()) => {
            debug!("locked `{}`", path.display());
            Ok(RepoLock {
                file,
                path: path.to_owned(),
            })
        }
        Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
            Err(Error::RepositoryLocked(path.to_owned()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Lock `repo` against other crosspick runs, through a file in its git directory.
pub async fn acquire(repo: &Repo) -> Result<RepoLock> {
    let git_dir = repo.run(git::rev_parse()).await?.stdout;

    acquire_at(&Path::new(git_dir.trim()).join(LOCK_FILE))
}
