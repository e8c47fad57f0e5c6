//! Run configuration: the optional JSON file and the validated [`WorkflowConfig`] every run is
//! driven by.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::Result;
use crate::remote;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{0}` must not be empty")]
    Empty(&'static str),
    #[error("`{0}` must not start with `-`, got `{1}`")]
    OptionLike(&'static str, String),
}

/// On-disk schema. Every field is required.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub source_repo_url: String,
    pub source_branch: String,
    pub commit_hash: String,
    pub target_branch: String,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<ConfigFile, Error> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_owned(),
            source,
        })?;

        ConfigFile::parse(&content).map_err(|source| Error::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<ConfigFile, serde_json::Error> {
        serde_json::from_str(content)
    }
}

impl TryFrom<ConfigFile> for WorkflowConfig {
    type Error = crate::Error;

    fn try_from(file: ConfigFile) -> Result<WorkflowConfig> {
        WorkflowConfig::new(
            file.source_repo_url,
            file.source_branch,
            file.commit_hash,
            file.target_branch,
        )
    }
}

/// Everything a run needs, checked once and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    remote_url: String,
    source_branch: String,
    commit_hash: String,
    target_branch: String,
}

fn required(field: &'static str, value: String) -> Result<String, Error> {
    let value = value.trim().to_owned();

    if value.is_empty() {
        Err(Error::Empty(field))
    } else if value.starts_with('-') {
        // git would read it as an option
        Err(Error::OptionLike(field, value))
    } else {
        Ok(value)
    }
}

impl WorkflowConfig {
    /// Fails on an empty field, a field starting with `-`, or a URL that is neither SSH nor HTTPS
    /// shaped. The commit hash is
    /// not checked any further: only git can tell whether it resolves.
    pub fn new(
        remote_url: impl Into<String>,
        source_branch: impl Into<String>,
        commit_hash: impl Into<String>,
        target_branch: impl Into<String>,
    ) -> Result<WorkflowConfig> {
        let remote_url = required("sourceRepoUrl", remote_url.into())?;
        remote::normalize_url(&remote_url)?;

        Ok(WorkflowConfig {
            remote_url,
            source_branch: required("sourceBranch", source_branch.into())?,
            commit_hash: required("commitHash", commit_hash.into())?,
            target_branch: required("targetBranch", target_branch.into())?,
        })
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn source_branch(&self) -> &str {
        &self.source_branch
    }

    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    pub fn target_branch(&self) -> &str {
        &self.target_branch
    }
}
