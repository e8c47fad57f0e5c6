//! The end-to-end run: resolve the source remote, fetch, stage the source branch on a
//! temporary branch, get onto the target branch, cherry-pick, and push if allowed.

use std::collections::BTreeSet;

use log::{info, warn};

use crate::branch::{temp_branch_name, Branches, TargetTransition};
use crate::config::WorkflowConfig;
use crate::error::{Error, Result};
use crate::git::{self, Repo};
use crate::history::{CommitRecord, History};
use crate::lock;
use crate::pick::{CherryPick, CherryPickResult, Progress};
use crate::push::{Confirmation, PushGate, PushOutcome, PushRequest};
use crate::remote::Remotes;

// lines of conflict diff kept for display
const DIFF_CONTEXT_LINES: usize = 40;

/// What a human needs to finish a conflicting cherry-pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
    pub files: BTreeSet<String>,
    /// The picked commit and the start of the conflict diff
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Pushed,
    CompletedNotPushed,
    /// The working tree is mid-cherry-pick, the temporary branch is kept
    ConflictPendingManualResolution(ConflictReport),
    Failed(String),
}

impl RunStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Pushed | RunStatus::CompletedNotPushed => 0,
            RunStatus::Failed(_) => 1,
            RunStatus::ConflictPendingManualResolution(_) => 2,
        }
    }
}

pub struct Workflow {
    repo: Repo,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(repo: Repo, config: WorkflowConfig) -> Workflow {
        Workflow { repo, config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run the whole pipeline. `confirm` is asked once, only after a clean cherry-pick, whether
    /// the temporary branch may be force-pushed onto the target; `progress` sees the live
    /// output of the cherry-pick. An [`Confirmation::Interrupted`] answer fails the run with
    /// [`Error::Interrupted`] and keeps the temporary branch.
    ///
    /// Note that a target branch which doesn't exist yet is published to `origin` before the
    /// cherry-pick is even attempted.
    pub async fn run<C, P>(&self, confirm: C, progress: P) -> Result<RunStatus>
    where
        C: FnOnce(&PushRequest) -> Confirmation,
        P: FnMut(Progress),
    {
        let _lock = lock::acquire(&self.repo).await?;
        let config = &self.config;

        let remote = Remotes::new(&self.repo)
            .ensure(config.remote_url())
            .await?;
        History::new(&self.repo)
            .fetch_branch(&remote.name, config.source_branch())
            .await?;

        let branches = Branches::new(&self.repo);
        let temp = temp_branch_name(config.source_branch());
        let source_ref = format!("{}/{}", remote.name, config.source_branch());

        branches.create_temporary(&temp, &source_ref).await?;

        let (target, transition) = branches.ensure_target(config.target_branch()).await?;
        if transition == TargetTransition::CreatedAndPublished {
            info!("`{}` did not exist and was published to origin", target.name);
        }

        let picked = CherryPick::new(&self.repo)
            .apply(config.commit_hash(), progress)
            .await?;

        match picked {
            CherryPickResult::Applied => {}
            CherryPickResult::Conflicted(files) => {
                warn!("resolve the conflicts by hand, `{temp}` is left in place");

                let context = self.conflict_context().await;
                return Ok(RunStatus::ConflictPendingManualResolution(ConflictReport {
                    files,
                    context,
                }));
            }
            CherryPickResult::Failed(reason) => return Ok(RunStatus::Failed(reason)),
        }

        let request = PushRequest::new(&temp, &target.name);
        let confirmed = match confirm(&request) {
            Confirmation::Push => true,
            Confirmation::Skip => false,
            Confirmation::Interrupted => {
                warn!("interrupted, `{temp}` is left in place");
                return Err(Error::Interrupted);
            }
        };
        let outcome = PushGate::new(&self.repo)
            .push_if(&request, confirmed)
            .await?;

        branches.discard(&temp).await;

        Ok(match outcome {
            PushOutcome::Pushed => RunStatus::Pushed,
            PushOutcome::Declined => RunStatus::CompletedNotPushed,
        })
    }

    // best effort: a failure here only loses display context
    async fn conflict_context(&self) -> String {
        let mut context = String::new();

        let commit = self
            .repo
            .output(
                git::log()
                    .amount(1)
                    .format(git::Format::Oneline)
                    .branch(git::Branch(self.config.commit_hash())),
            )
            .await;
        if let Ok(out) = commit {
            context.push_str(&format!("picking: {}\n", out.stdout));
        }

        match self.repo.output(git::diff()).await {
            Ok(out) => {
                let lines = out.stdout.lines().collect::<Vec<_>>();

                lines
                    .iter()
                    .take(DIFF_CONTEXT_LINES)
                    .for_each(|line| context.push_str(&format!("{line}\n")));
                if lines.len() > DIFF_CONTEXT_LINES {
                    context.push_str(&format!(
                        "... ({} more lines)\n",
                        lines.len() - DIFF_CONTEXT_LINES
                    ));
                }
            }
            Err(e) => warn!("could not read the conflict diff: {e}"),
        }

        context
    }
}

/// Interactive discovery: connect and fetch the source branch, then list its commits so one
/// can be chosen.
pub async fn discover_commits(
    repo: &Repo,
    remote_url: &str,
    source_branch: &str,
    limit: Option<usize>,
) -> Result<Vec<CommitRecord>> {
    let _lock = lock::acquire(repo).await?;

    let remote = Remotes::new(repo).ensure(remote_url).await?;
    let history = History::new(repo);

    history.fetch_branch(&remote.name, source_branch).await?;
    history
        .list_commits(&remote.name, source_branch, limit)
        .await
}
