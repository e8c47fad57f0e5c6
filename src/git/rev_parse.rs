use tokio::process::Command;

use super::GitCmd;

pub struct RevParse;

/// `git rev-parse --absolute-git-dir`
pub fn rev_parse() -> RevParse {
    RevParse
}

impl GitCmd for RevParse {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("rev-parse").arg("--absolute-git-dir");
    }

    fn step(&self) -> &'static str {
        "rev-parse"
    }
}
