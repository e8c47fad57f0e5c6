use tokio::process::Command;

use super::{GitCmd, Remote as RemoteName};

pub struct Remote {
    name: String,
    url: String,
}

/// `git remote add <name> <url>`
pub fn remote<T: Into<String>>(RemoteName(name): RemoteName<T>, url: &str) -> Remote {
    Remote {
        name: name.into(),
        url: url.to_owned(),
    }
}

impl GitCmd for Remote {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("remote")
            .arg("add")
            .arg("--end-of-options")
            .arg(self.name)
            .arg(self.url);
    }

    fn step(&self) -> &'static str {
        "remote add"
    }
}
