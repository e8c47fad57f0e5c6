use tokio::process::Command;

use super::{Branch, GitCmd, Remote};

#[derive(Default)]
pub struct Fetch {
    remote: Option<String>,
    branch: Option<String>,
}

pub fn fetch() -> Fetch {
    Fetch::default()
}

impl Fetch {
    pub fn remote<T: Into<String>>(self, Remote(remote): Remote<T>) -> Fetch {
        Fetch {
            remote: Some(remote.into()),
            ..self
        }
    }

    pub fn branch<T: Into<String>>(self, Branch(branch): Branch<T>) -> Fetch {
        Fetch {
            branch: Some(branch.into()),
            ..self
        }
    }
}

impl GitCmd for Fetch {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("fetch").arg("--end-of-options");

        self.remote.map(|r| cmd.arg(r));
        self.branch.map(|b| cmd.arg(b));
    }

    fn step(&self) -> &'static str {
        "fetch"
    }
}
