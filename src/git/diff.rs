use tokio::process::Command;

use super::GitCmd;

pub struct Diff;

/// Unstaged changes, which during a conflicted pick is the combined conflict diff
pub fn diff() -> Diff {
    Diff
}

impl GitCmd for Diff {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("diff").arg("--no-color");
    }

    fn step(&self) -> &'static str {
        "diff"
    }
}
