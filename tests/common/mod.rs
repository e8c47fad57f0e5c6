//! Throwaway repositories for driving crosspick against real git.
//!
//! Layout under one temporary directory:
//! - `source`: the repository commits are picked from, reachable as [`SOURCE_URL`] through an
//!   `insteadOf` rewrite configured in `work`
//! - `origin.git`: bare repository, the `origin` of `work`
//! - `work`: the repository crosspick runs in

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crosspick::git::Repo;
use crosspick::WorkflowConfig;
use tempfile::TempDir;

pub const SOURCE_URL: &str = "https://example.com/acme/lib.git";
pub const SOURCE_SSH_URL: &str = "git@example.com:acme/lib.git";

pub fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("git should be installed");

    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    String::from_utf8(out.stdout).unwrap().trim().to_owned()
}

pub fn git_ok(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("git should be installed")
        .status
        .success()
}

fn init(parent: &Path, name: &str, bare: bool) -> PathBuf {
    let mut args = vec!["init", "-q"];
    if bare {
        args.push("--bare");
    }
    args.push(name);
    git(parent, &args);

    let dir = parent.join(name);
    git(&dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    if !bare {
        git(&dir, &["config", "user.name", "Crosspick Tests"]);
        git(&dir, &["config", "user.email", "tests@crosspick.invalid"]);
        git(&dir, &["config", "commit.gpgSign", "false"]);
    }

    dir
}

/// Write `content` to `file` and commit it, returning the new commit's hash
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) -> String {
    fs::write(dir.join(file), content).unwrap();
    git(dir, &["add", "--all"]);
    git(dir, &["commit", "-q", "-m", message]);

    git(dir, &["rev-parse", "HEAD"])
}

pub struct Fixture {
    _root: TempDir,
    pub source: PathBuf,
    pub origin: PathBuf,
    pub work: PathBuf,
    /// On `hotfix` in `source`: adds `c.txt`, applies cleanly anywhere
    pub hotfix: String,
    /// On `conflict` in `source`: rewrites `a.txt`
    pub conflicting: String,
}

impl Fixture {
    pub fn new() -> Fixture {
        let root = tempfile::tempdir().unwrap();

        let source = init(root.path(), "source", false);
        commit_file(&source, "a.txt", "1\n", "init");
        commit_file(&source, "b.txt", "b\n", "feat: b");
        git(&source, &["checkout", "-q", "-b", "hotfix", "main~1"]);
        let hotfix = commit_file(&source, "c.txt", "c\n", "fix: c");
        git(&source, &["checkout", "-q", "-b", "conflict", "main~1"]);
        let conflicting = commit_file(&source, "a.txt", "2\n", "change a");
        git(&source, &["checkout", "-q", "main"]);

        let origin = init(root.path(), "origin.git", true);

        let work = init(root.path(), "work", false);
        commit_file(&work, "README", "project\n", "project");
        git(&work, &["remote", "add", "origin", origin.to_str().unwrap()]);
        git(&work, &["push", "-q", "-u", "origin", "main"]);

        let rewrite = format!("url.file://{}.insteadOf", source.display());
        git(&work, &["config", &rewrite, SOURCE_URL]);
        git(&work, &["config", "--add", &rewrite, SOURCE_SSH_URL]);

        // the picked commits must be known to `work`, crosspick only fetches the source branch
        git(&work, &["fetch", "-q", source.to_str().unwrap(), "hotfix", "conflict"]);

        Fixture {
            _root: root,
            source,
            origin,
            work,
            hotfix,
            conflicting,
        }
    }

    pub fn repo(&self) -> Repo {
        Repo::open(&self.work).timeout(Some(Duration::from_secs(60)))
    }

    pub fn config(&self, commit: &str, target: &str) -> WorkflowConfig {
        WorkflowConfig::new(SOURCE_URL, "main", commit, target).unwrap()
    }

    pub fn source_head(&self) -> String {
        git(&self.source, &["rev-parse", "main"])
    }

    pub fn local_branches(&self) -> Vec<String> {
        git(&self.work, &["branch", "--format=%(refname:short)"])
            .lines()
            .map(str::to_owned)
            .collect()
    }

    pub fn has_local_branch(&self, name: &str) -> bool {
        self.local_branches().iter().any(|b| b == name)
    }

    /// Hash of `name` on `origin`, if it was pushed there
    pub fn origin_branch(&self, name: &str) -> Option<String> {
        let out = git(
            &self.origin,
            &[
                "for-each-ref",
                "--format=%(objectname)",
                &format!("refs/heads/{name}"),
            ],
        );

        (!out.is_empty()).then_some(out)
    }

    /// A local `release` branch, never pushed, whose `a.txt` clashes with [`Fixture::conflicting`]
    pub fn conflicting_release(&self) {
        git(&self.work, &["checkout", "-q", "-b", "release"]);
        commit_file(&self.work, "a.txt", "ours\n", "ours");
        git(&self.work, &["checkout", "-q", "main"]);
    }
}
