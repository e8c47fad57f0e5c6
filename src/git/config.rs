use tokio::process::Command;

use super::GitCmd;

pub struct Config {
    pattern: String,
}

/// `git config --get-regexp <pattern>`: every `<key> <value>` whose key matches, as written in
/// the config files. Exits with 1 when nothing matches.
pub fn config_matching<T: Into<String>>(pattern: T) -> Config {
    Config {
        pattern: pattern.into(),
    }
}

impl GitCmd for Config {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("config").arg("--get-regexp").arg(self.pattern);
    }

    fn step(&self) -> &'static str {
        "config"
    }
}
