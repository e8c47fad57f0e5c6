use tokio::process::Command;

use super::{Branch, GitCmd, Remote};

#[derive(Default)]
pub struct Push {
    remote: Option<String>,
    set_upstream: bool,
    force: bool,
    refspecs: Vec<String>,
}

pub fn push() -> Push {
    Push::default()
}

impl Push {
    /// Push to `remote` and record it as the upstream of the pushed branches (`-u`)
    pub fn upstream<T: Into<String>>(self, Remote(upstream): Remote<T>) -> Push {
        Push {
            remote: Some(upstream.into()),
            set_upstream: true,
            ..self
        }
    }

    pub fn remote<T: Into<String>>(self, Remote(remote): Remote<T>) -> Push {
        Push {
            remote: Some(remote.into()),
            ..self
        }
    }

    pub fn force(self) -> Push {
        Push {
            force: true,
            ..self
        }
    }

    pub fn branch<T: Into<String>>(self, Branch(branch): Branch<T>) -> Push {
        let mut refspecs = self.refspecs;
        refspecs.push(branch.into());

        Push { refspecs, ..self }
    }

    /// `<src>:<dst>`
    pub fn refspec<S: Into<String>, D: Into<String>>(
        self,
        Branch(src): Branch<S>,
        Branch(dst): Branch<D>,
    ) -> Push {
        let mut refspecs = self.refspecs;
        refspecs.push(format!("{}:{}", src.into(), dst.into()));

        Push { refspecs, ..self }
    }
}

impl GitCmd for Push {
    fn setup(self, cmd: &mut Command) {
        cmd.arg("push");

        if self.force {
            cmd.arg("--force");
        }
        if self.set_upstream {
            cmd.arg("-u");
        }

        self.remote.map(|remote| cmd.arg(remote));
        self.refspecs.iter().for_each(|r| {
            cmd.arg(r);
        });
    }

    fn step(&self) -> &'static str {
        "push"
    }
}
