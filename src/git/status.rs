use tokio::process::Command;

use super::GitCmd;

pub enum Style {
    /// `--porcelain -z`: stable, NUL-separated, paths unquoted
    Porcelain,
    Short,
}

pub struct Status {
    style: Style,
}

pub fn status(style: Style) -> Status {
    Status { style }
}

impl GitCmd for Status {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("status");

        match self.style {
            Style::Porcelain => cmd.arg("--porcelain").arg("-z"),
            Style::Short => cmd.arg("--short"),
        };
    }

    fn step(&self) -> &'static str {
        "status"
    }
}
