//! Fetching a branch of the source remote and reading its history.

use chrono::{DateTime, FixedOffset};
use log::info;

use crate::error::{Error, Result};
use crate::git::{self, Repo};

/// Separates the fields of a [`git::Format::Record`] line
pub const FIELD_SEPARATOR: &str = "|";

// date, author, subject, hash
const MIN_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub subject: String,
}

/// Decode one line of `git log --format=%aI|%an|%s|%H`. The subject is everything between the
/// author and the trailing hash, since it can contain the separator itself.
pub fn parse_log_line(line: &str) -> Result<CommitRecord> {
    let malformed = |reason: &str| Error::HistoryParseError {
        line: line.to_owned(),
        reason: reason.to_owned(),
    };

    let fields = line.split(FIELD_SEPARATOR).collect::<Vec<_>>();
    if fields.len() < MIN_FIELDS {
        return Err(malformed(&format!(
            "expected at least {MIN_FIELDS} fields, found {}",
            fields.len()
        )));
    }

    let last = fields.len() - 1;
    let hash = fields[last].trim();
    if hash.is_empty() {
        return Err(malformed("missing commit hash"));
    }

    let date = DateTime::parse_from_rfc3339(fields[0].trim())
        .map_err(|e| malformed(&format!("invalid date: {e}")))?;

    Ok(CommitRecord {
        hash: hash.to_owned(),
        author: fields[1].to_owned(),
        date,
        subject: fields[2..last].join(FIELD_SEPARATOR),
    })
}

/// Decode a whole log, newest commit first as git prints it. Blank lines are skipped.
pub fn parse_log(output: &str) -> Result<Vec<CommitRecord>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_log_line)
        .collect()
}

pub struct History<'r> {
    repo: &'r Repo,
}

impl<'r> History<'r> {
    pub fn new(repo: &'r Repo) -> History<'r> {
        History { repo }
    }

    pub async fn fetch_branch(&self, remote: &str, branch: &str) -> Result<()> {
        info!("fetching `{branch}` from `{remote}`...");

        self.repo
            .run(
                git::fetch()
                    .remote(git::Remote(remote))
                    .branch(git::Branch(branch)),
            )
            .await
            .map_err(|source| {
                Error::or_timeout(source, |source| Error::FetchFailed {
                    branch: branch.to_owned(),
                    source,
                })
            })?;

        Ok(())
    }

    /// History of `remote/branch`, newest first. Only meaningful after [`History::fetch_branch`].
    pub async fn list_commits(
        &self,
        remote: &str,
        branch: &str,
        limit: Option<usize>,
    ) -> Result<Vec<CommitRecord>> {
        let log = git::log()
            .branch(git::Branch(format!("{remote}/{branch}")))
            .format(git::Format::Record);
        let log = match limit {
            Some(amount) => log.amount(amount),
            None => log,
        };

        let out = self.repo.run(log).await?;
        let commits = parse_log(&out.stdout)?;

        info!("found {} commits on `{remote}/{branch}`", commits.len());

        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
2024-03-02T10:15:00+01:00|Ada Lovelace|fix: handle a | in titles|1111111111111111111111111111111111111111
2024-03-01T09:00:00+00:00|Grace Hopper|initial import|2222222222222222222222222222222222222222
";

    #[test]
    fn log_lines_are_decoded_newest_first() {
        let commits = parse_log(LOG).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].author, "Ada Lovelace");
        assert_eq!(commits[0].hash, "1111111111111111111111111111111111111111");
        assert_eq!(commits[1].subject, "initial import");
        assert!(commits[0].date > commits[1].date);
    }

    #[test]
    fn subject_may_contain_the_separator() {
        let commit = parse_log_line(LOG.lines().next().unwrap()).unwrap();

        assert_eq!(commit.subject, "fix: handle a | in titles");
    }

    #[test]
    fn empty_subject_is_fine() {
        let commit = parse_log_line("2024-03-01T09:00:00Z|me||abc123").unwrap();

        assert_eq!(commit.subject, "");
        assert_eq!(commit.hash, "abc123");
    }

    #[test]
    fn too_few_fields_is_an_error() {
        let err = parse_log_line("2024-03-01T09:00:00Z|me|abc123").unwrap_err();

        assert!(matches!(err, Error::HistoryParseError { .. }));
    }

    #[test]
    fn bad_dates_are_an_error() {
        let err = parse_log_line("yesterday|me|subject|abc123").unwrap_err();

        assert!(matches!(err, Error::HistoryParseError { .. }));
    }

    #[test]
    fn one_bad_line_fails_the_whole_log() {
        let log = format!("{LOG}garbage\n");

        assert!(parse_log(&log).is_err());
    }

    #[test]
    fn blank_output_is_an_empty_history() {
        assert!(parse_log("\n\n").unwrap().is_empty());
    }
}
