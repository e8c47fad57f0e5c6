use tokio::process::Command;

use super::GitCmd;

enum Action {
    List(String),
    ShowCurrent,
    Delete(String),
}

pub struct Branch {
    action: Action,
}

pub fn branch() -> BranchBuilder {
    BranchBuilder
}

pub struct BranchBuilder;

impl BranchBuilder {
    /// `git branch --list <name>`: prints the branch if it exists, nothing otherwise
    pub fn list<T: Into<String>>(self, name: T) -> Branch {
        Branch {
            action: Action::List(name.into()),
        }
    }

    /// Prints nothing when HEAD is detached
    pub fn show_current(self) -> Branch {
        Branch {
            action: Action::ShowCurrent,
        }
    }

    /// Delete even if the branch isn't merged anywhere
    pub fn force_delete<T: Into<String>>(self, name: T) -> Branch {
        Branch {
            action: Action::Delete(name.into()),
        }
    }
}

impl GitCmd for Branch {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("branch");

        match self.action {
            Action::List(name) => cmd.arg("--list").arg("--end-of-options").arg(name),
            Action::ShowCurrent => cmd.arg("--show-current"),
            Action::Delete(name) => cmd.arg("-D").arg("--end-of-options").arg(name),
        };
    }

    fn step(&self) -> &'static str {
        match self.action {
            Action::List(_) | Action::ShowCurrent => "branch",
            Action::Delete(_) => "branch -D",
        }
    }
}
