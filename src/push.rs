use log::info;

use crate::error::Result;
use crate::git::{self, Repo};
use crate::remote::ORIGIN;

/// What is about to be force-pushed, shown to whoever confirms it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub remote: String,
    pub source: String,
    pub target: String,
}

impl PushRequest {
    pub fn new(temp_branch: &str, target_branch: &str) -> PushRequest {
        PushRequest {
            remote: ORIGIN.to_owned(),
            source: temp_branch.to_owned(),
            target: target_branch.to_owned(),
        }
    }

    pub fn refspec(&self) -> String {
        format!("{}:{}", self.source, self.target)
    }
}

/// Answer given to a [`PushRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Push,
    Skip,
    /// No answer: the run is stopped where it is, nothing is pushed or cleaned up
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    Declined,
}

pub struct PushGate<'r> {
    repo: &'r Repo,
}

impl<'r> PushGate<'r> {
    pub fn new(repo: &'r Repo) -> PushGate<'r> {
        PushGate { repo }
    }

    /// Force-push `request` if and only if `confirmed`.
    pub async fn push_if(&self, request: &PushRequest, confirmed: bool) -> Result<PushOutcome> {
        if !confirmed {
            info!("not pushing `{}`", request.refspec());
            return Ok(PushOutcome::Declined);
        }

        info!("force-pushing `{}` to `{}`...", request.refspec(), request.remote);
        self.repo
            .run(
                git::push()
                    .force()
                    .remote(git::Remote(request.remote.as_str()))
                    .refspec(
                        git::Branch(request.source.as_str()),
                        git::Branch(request.target.as_str()),
                    ),
            )
            .await?;

        Ok(PushOutcome::Pushed)
    }
}
