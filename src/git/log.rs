use super::{Branch, Format, GitCmd};

use tokio::process::Command;

#[derive(Default)]
pub struct Log {
    amount: Option<usize>,
    branch: Option<String>,
    format: Option<Format>,
}

pub fn log() -> Log {
    Log::default()
}

impl Log {
    pub fn amount(self, amount: usize) -> Log {
        Log {
            amount: Some(amount),
            ..self
        }
    }

    pub fn branch<T: Into<String>>(self, Branch(branch): Branch<T>) -> Log {
        Log {
            branch: Some(branch.into()),
            ..self
        }
    }

    pub fn format(self, format: Format) -> Log {
        Log {
            format: Some(format),
            ..self
        }
    }
}

impl GitCmd for Log {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("log");

        self.amount.map(|x| cmd.arg(format!("-{x}")));
        self.format
            .map(|f| cmd.arg(format!("--format={}", f.as_str())));
        // `--` keeps a branch named like a file from being read as a path
        self.branch.map(|b| cmd.arg(b).arg("--"));
    }

    fn step(&self) -> &'static str {
        "log"
    }
}
