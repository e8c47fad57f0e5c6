mod common;

use std::collections::BTreeSet;

use common::{commit_file, git, Fixture, SOURCE_SSH_URL, SOURCE_URL};
use crosspick::branch::{Branches, TargetTransition};
use crosspick::history::History;
use crosspick::pick::{CherryPick, CherryPickResult, Progress};
use crosspick::remote::Remotes;
use crosspick::Error;

async fn fetched(fx: &Fixture) {
    let repo = fx.repo();
    let remote = Remotes::new(&repo).ensure(SOURCE_URL).await.unwrap();

    History::new(&repo)
        .fetch_branch(&remote.name, "main")
        .await
        .unwrap();
}

#[tokio::test]
async fn remotes_are_found_by_canonical_url() {
    let fx = Fixture::new();
    let repo = fx.repo();
    let remotes = Remotes::new(&repo);

    assert!(!remotes.exists(SOURCE_SSH_URL).await.unwrap());

    let added = remotes.ensure(SOURCE_URL).await.unwrap();
    assert_eq!(added.name, "lib");
    assert_eq!(added.url, SOURCE_URL);

    assert!(remotes.exists(SOURCE_SSH_URL).await.unwrap());
    assert_eq!(remotes.ensure(SOURCE_SSH_URL).await.unwrap(), added);
    assert_eq!(remotes.list_connected().await.unwrap(), vec![added]);
}

#[tokio::test]
async fn taken_remote_name_is_a_registration_failure() {
    let fx = Fixture::new();
    git(&fx.work, &["remote", "add", "lib", "https://example.com/other/lib.git"]);
    let repo = fx.repo();

    let err = Remotes::new(&repo).ensure(SOURCE_URL).await.unwrap_err();

    assert!(
        matches!(&err, Error::RemoteRegistrationFailed { name, .. } if name == "lib"),
        "{err}"
    );
}

#[tokio::test]
async fn history_lists_the_fetched_branch_newest_first() {
    let fx = Fixture::new();
    fetched(&fx).await;
    let repo = fx.repo();

    let commits = History::new(&repo)
        .list_commits("lib", "main", None)
        .await
        .unwrap();

    let subjects = commits.iter().map(|c| c.subject.as_str()).collect::<Vec<_>>();
    assert_eq!(subjects, vec!["feat: b", "init"]);
    assert_eq!(commits[0].hash, fx.source_head());
    assert_eq!(commits[0].author, "Crosspick Tests");

    let limited = History::new(&repo)
        .list_commits("lib", "main", Some(1))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn temporary_branch_is_recreated_not_duplicated() {
    let fx = Fixture::new();
    fetched(&fx).await;
    let repo = fx.repo();
    let branches = Branches::new(&repo);

    let first = branches.create_temporary("temp-x", "lib/main").await.unwrap();
    let second = branches.create_temporary("temp-x", "lib/main").await.unwrap();

    assert_eq!(first, second);
    assert!(second.is_temporary);
    assert_eq!(
        fx.local_branches().iter().filter(|b| *b == "temp-x").count(),
        1
    );
    assert_eq!(git(&fx.work, &["rev-parse", "temp-x"]), fx.source_head());
    assert_eq!(branches.current().await.unwrap().as_deref(), Some("temp-x"));
}

#[tokio::test]
async fn stale_temporary_branch_is_replaced() {
    let fx = Fixture::new();
    fetched(&fx).await;
    git(&fx.work, &["branch", "temp-main", "main"]);
    let repo = fx.repo();

    Branches::new(&repo)
        .create_temporary("temp-main", "lib/main")
        .await
        .unwrap();

    assert_eq!(git(&fx.work, &["rev-parse", "temp-main"]), fx.source_head());
}

#[tokio::test]
async fn target_branch_is_published_only_when_created() {
    let fx = Fixture::new();
    let repo = fx.repo();
    let branches = Branches::new(&repo);

    let (created, transition) = branches.ensure_target("release").await.unwrap();
    assert_eq!(transition, TargetTransition::CreatedAndPublished);
    assert!(created.exists && !created.is_temporary);
    assert!(fx.origin_branch("release").is_some());

    git(&fx.work, &["switch", "-q", "main"]);
    git(&fx.work, &["branch", "local-only"]);

    let (_, transition) = branches.ensure_target("local-only").await.unwrap();
    assert_eq!(transition, TargetTransition::Switched);
    assert_eq!(fx.origin_branch("local-only"), None);
    assert_eq!(branches.current().await.unwrap().as_deref(), Some("local-only"));
}

#[tokio::test]
async fn clean_pick_is_applied() {
    let fx = Fixture::new();
    let repo = fx.repo();
    let mut progress = Vec::new();

    let result = CherryPick::new(&repo)
        .apply(&fx.hotfix, |p| progress.push(p))
        .await
        .unwrap();

    assert_eq!(result, CherryPickResult::Applied);
    assert_eq!(git(&fx.work, &["show", "HEAD:c.txt"]), "c");
    assert!(progress.iter().any(|p| matches!(p, Progress::Stdout(_))));
}

#[tokio::test]
async fn conflicting_pick_lists_exactly_the_unmerged_files() {
    let fx = Fixture::new();
    commit_file(&fx.work, "a.txt", "ours\n", "ours");
    // an unrelated local edit must not be reported
    commit_file(&fx.work, "notes.txt", "keep\n", "notes");
    std::fs::write(fx.work.join("notes.txt"), "edited\n").unwrap();
    let repo = fx.repo();

    let result = CherryPick::new(&repo)
        .apply(&fx.conflicting, |_| {})
        .await
        .unwrap();

    assert_eq!(
        result,
        CherryPickResult::Conflicted(BTreeSet::from(["a.txt".to_string()]))
    );
}

#[tokio::test]
async fn remote_urls_are_reported_canonical_but_stored_as_given() {
    let fx = Fixture::new();
    let repo = fx.repo();

    let added = Remotes::new(&repo).ensure(SOURCE_SSH_URL).await.unwrap();

    assert_eq!(added.url, SOURCE_URL);
    assert_eq!(git(&fx.work, &["config", "remote.lib.url"]), SOURCE_SSH_URL);
    assert_eq!(
        Remotes::new(&repo).list_connected().await.unwrap(),
        vec![added]
    );
}

#[tokio::test]
async fn option_like_branch_is_never_read_as_a_fetch_option() {
    let fx = Fixture::new();
    let repo = fx.repo();
    let remote = Remotes::new(&repo).ensure(SOURCE_URL).await.unwrap();
    let marker = fx.work.join("injected");
    let branch = format!("--upload-pack=touch {}; git-upload-pack", marker.display());

    let err = History::new(&repo)
        .fetch_branch(&remote.name, &branch)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::FetchFailed { .. }), "{err}");
    assert!(!marker.exists());
}

#[tokio::test]
async fn undeletable_temporary_branch_stops_everything() {
    let fx = Fixture::new();
    fetched(&fx).await;
    git(&fx.work, &["branch", "temp-x", "main"]);
    let before = git(&fx.work, &["rev-parse", "temp-x"]);
    // a branch checked out in another worktree cannot be deleted
    let other = fx.work.with_file_name("other-worktree");
    git(&fx.work, &["worktree", "add", "-q", other.to_str().unwrap(), "temp-x"]);
    let repo = fx.repo();

    let err = Branches::new(&repo)
        .create_temporary("temp-x", "lib/main")
        .await
        .unwrap_err();

    assert!(
        matches!(&err, Error::BranchCleanupFailed { branch, .. } if branch == "temp-x"),
        "{err}"
    );
    assert_eq!(git(&fx.work, &["branch", "--show-current"]), "main");
    assert_eq!(git(&fx.work, &["rev-parse", "temp-x"]), before);
}
