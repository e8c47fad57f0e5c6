use super::GitCmd;

use tokio::process::Command;

pub struct Switch {
    to: String,
}

pub fn switch<T: Into<String>>(to: T) -> Switch {
    Switch { to: to.into() }
}

impl GitCmd for Switch {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("switch").arg("--end-of-options").arg(self.to);
    }

    fn step(&self) -> &'static str {
        "switch"
    }
}
