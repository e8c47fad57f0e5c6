use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};

use crosspick::git::Repo;
use crosspick::pick::Progress;
use crosspick::push::{Confirmation, PushRequest};
use crosspick::{discover_commits, ConfigFile, RunStatus, Workflow, WorkflowConfig};

mod prompt;

// conventional status for a run stopped by SIGINT
const INTERRUPTED: u8 = 130;

/// Fetch a branch from another repository and cherry-pick one of its commits onto a branch of
/// this one, optionally force-pushing the result to `origin`.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[arg(
        short,
        long,
        help = "JSON file containing `sourceRepoUrl`, `sourceBranch`, `commitHash` and `targetBranch`",
        conflicts_with_all = ["url", "branch", "commit", "target"]
    )]
    config: Option<PathBuf>,
    #[arg(short, long, help = "URL of the source repository (SSH or HTTPS)")]
    url: Option<String>,
    #[arg(short, long, help = "Branch of the source repository to fetch")]
    branch: Option<String>,
    #[arg(
        long,
        help = "Commit to cherry-pick. When missing, pick one from the source branch's history"
    )]
    commit: Option<String>,
    #[arg(short, long, help = "Branch receiving the commit, created if it doesn't exist")]
    target: Option<String>,
    #[arg(
        short,
        long,
        default_value = ".",
        help = "Work directory containing the repository to update"
    )]
    repo: PathBuf,
    #[arg(
        long,
        default_value_t = 300,
        help = "Seconds any single git command may run, 0 to wait forever"
    )]
    timeout: u64,
    #[arg(short, long, help = "Push without asking", conflicts_with = "no_push")]
    yes: bool,
    #[arg(long, help = "Never push the result")]
    no_push: bool,
    #[arg(
        long,
        default_value_t = 50,
        help = "Number of commits offered when choosing one interactively"
    )]
    max_count: usize,
}

async fn resolve_config(args: &Args, repo: &Repo) -> anyhow::Result<WorkflowConfig> {
    if let Some(path) = &args.config {
        let file = ConfigFile::load(path)?;
        return Ok(WorkflowConfig::try_from(file)?);
    }

    let url = match &args.url {
        Some(url) => url.clone(),
        None => prompt::url()?,
    };
    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => prompt::text("Source branch")?,
    };
    let commit = match &args.commit {
        Some(commit) => commit.clone(),
        None => {
            let commits = discover_commits(repo, &url, &branch, Some(args.max_count)).await?;
            prompt::commit(&commits)?
        }
    };
    let target = match &args.target {
        Some(target) => target.clone(),
        None => prompt::text("Target branch")?,
    };

    Ok(WorkflowConfig::new(url, branch, commit, target)?)
}

/// Whether `e` comes from the user interrupting the run, Ctrl-C at a prompt included
fn interrupted(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| {
        if let Some(crosspick::Error::Interrupted) = cause.downcast_ref::<crosspick::Error>() {
            return true;
        }
        if let Some(dialoguer::Error::IO(e)) = cause.downcast_ref::<dialoguer::Error>() {
            return e.kind() == io::ErrorKind::Interrupted;
        }

        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::Interrupted)
    })
}

fn confirm_push(args: &Args, request: &PushRequest) -> Confirmation {
    if args.no_push {
        return Confirmation::Skip;
    }
    if args.yes {
        return Confirmation::Push;
    }

    match prompt::confirm(&format!(
        "Force-push `{}` to `{}`?",
        request.refspec(),
        request.remote
    )) {
        Ok(true) => Confirmation::Push,
        Ok(false) => Confirmation::Skip,
        Err(e) if interrupted(&e) => Confirmation::Interrupted,
        Err(e) => {
            warn!("could not ask for confirmation, not pushing: {e}");
            Confirmation::Skip
        }
    }
}

fn show_progress(progress: Progress) {
    match progress {
        Progress::Stdout(line) => println!("{line}"),
        Progress::Stderr(line) => eprintln!("{line}"),
        Progress::Status(status) => eprintln!("repository status:\n{status}"),
    }
}

async fn run(args: &Args, repo: &Repo) -> anyhow::Result<RunStatus> {
    let config = resolve_config(args, repo).await?;

    info!(
        "cherry-picking {} from `{}` ({}) onto `{}`",
        config.commit_hash(),
        config.source_branch(),
        config.remote_url(),
        config.target_branch()
    );

    let workflow = Workflow::new(repo.clone(), config);

    Ok(workflow
        .run(|request| confirm_push(args, request), show_progress)
        .await?)
}

fn report(status: &RunStatus) {
    match status {
        RunStatus::Pushed => info!("done, result pushed"),
        RunStatus::CompletedNotPushed => info!("done, nothing pushed"),
        RunStatus::ConflictPendingManualResolution(report) => {
            error!("cherry-pick stopped on conflicts in:");
            report.files.iter().for_each(|file| eprintln!("    {file}"));
            eprintln!("\n{}", report.context);
            eprintln!(
                "resolve them, then run `git cherry-pick --continue` or `git cherry-pick --abort`"
            );
        }
        RunStatus::Failed(reason) => error!("cherry-pick failed: {reason}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let timeout = (args.timeout > 0).then(|| Duration::from_secs(args.timeout));
    let repo = Repo::open(&args.repo).timeout(timeout);

    tokio::select! {
        biased;

        _ = tokio::signal::ctrl_c() => {
            error!("interrupted, any temporary branch was left in place");
            ExitCode::from(INTERRUPTED)
        }
        status = run(&args, &repo) => match status {
            Ok(status) => {
                report(&status);
                // exit codes are 0, 1 or 2
                ExitCode::from(status.exit_code() as u8)
            }
            Err(e) if interrupted(&e) => {
                error!("interrupted, any temporary branch was left in place");
                ExitCode::from(INTERRUPTED)
            }
            Err(e) => {
                error!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}
