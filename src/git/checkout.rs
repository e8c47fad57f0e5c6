use tokio::process::Command;

use super::GitCmd;

#[derive(Default)]
pub struct Checkout {
    new_branch: Option<String>,
    detach: bool,
    start_point: Option<String>,
}

pub fn checkout() -> Checkout {
    Checkout::default()
}

impl Checkout {
    /// `-b <name>`
    pub fn new_branch<T: Into<String>>(self, name: T) -> Checkout {
        Checkout {
            new_branch: Some(name.into()),
            ..self
        }
    }

    pub fn detach(self) -> Checkout {
        Checkout {
            detach: true,
            ..self
        }
    }

    pub fn start_point<T: Into<String>>(self, start_point: T) -> Checkout {
        Checkout {
            start_point: Some(start_point.into()),
            ..self
        }
    }
}

impl GitCmd for Checkout {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("checkout");

        if self.detach {
            cmd.arg("--detach");
        }

        self.new_branch.map(|b| cmd.arg("-b").arg(b));
        // checkout refuses `--end-of-options`, the trailing `--` at least keeps the start point
        // from being taken for a path
        self.start_point.map(|s| cmd.arg(s).arg("--"));
    }

    fn step(&self) -> &'static str {
        "checkout"
    }
}
