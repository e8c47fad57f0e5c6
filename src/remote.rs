//! Resolution of the source repository to a named remote: URL canonicalisation, lookup among
//! the remotes already configured, and registration of new ones.

use std::sync::LazyLock;

use log::{info, warn};
use regex::Regex;

use crate::error::{Error, Result};
use crate::git::{self, Repo};
use crate::shell;

/// Name given to a remote whose URL yields no usable repository name
pub const FALLBACK_REPO_NAME: &str = "source-repo";

/// The remote crosspick pushes to. Never considered as a source.
pub const ORIGIN: &str = "origin";

const REMOTE_URL_KEYS: &str = r"^remote\..+\.url$";

// user@host:org/repo.git
static SSH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9][A-Za-z0-9._-]*@([A-Za-z0-9.-]+):/?([A-Za-z0-9._~/-]+?)(?:\.git)?/?$",
    )
    .unwrap()
});

// https://[credentials@]host[:port]/org/repo.git
static HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https://(?:[^@/\s]+@)?([A-Za-z0-9.-]+(?::[0-9]+)?)/([A-Za-z0-9._~/-]+?)(?:\.git)?/?$",
    )
    .unwrap()
});

/// A remote and its URL in canonical form, see [`normalize_url`]. A configured URL that
/// can't be normalised is kept as is, and never matches a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    pub name: String,
    pub url: String,
}

/// Canonical HTTPS form of an SSH or HTTPS repository URL: `https://host/org/repo.git`.
pub fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim();

    let captures = SSH_URL
        .captures(url)
        .or_else(|| HTTPS_URL.captures(url))
        .ok_or_else(|| Error::InvalidUrlFormat(url.to_owned()))?;

    let host = captures[1].to_ascii_lowercase();
    let path = &captures[2];

    Ok(format!("https://{host}/{path}.git"))
}

/// Short name for the repository at `url`, used to name its remote.
pub fn derive_repo_name(url: &str) -> String {
    normalize_url(url)
        .ok()
        .as_deref()
        .and_then(|url| url.strip_suffix(".git"))
        .and_then(|url| url.rsplit('/').next())
        .filter(|name| !name.is_empty() && !name.starts_with('-'))
        .map_or_else(|| FALLBACK_REPO_NAME.to_owned(), str::to_owned)
}

/// Decode `git config --get-regexp` output for the `remote.<name>.url` keys, i.e. the fetch
/// URL of each remote, canonicalised where possible. `origin` and remotes without a usable URL
/// are left out.
pub fn parse_remotes(output: &str) -> Vec<RemoteSpec> {
    output
        .lines()
        .filter_map(|line| {
            let (key, url) = line.split_once(' ').unwrap_or((line, ""));
            let name = key.strip_prefix("remote.")?.strip_suffix(".url")?;

            Some((name, url.trim()))
        })
        .filter(|(name, _)| *name != ORIGIN)
        .filter(|(_, url)| !url.is_empty() && *url != "undefined")
        .map(|(name, url)| RemoteSpec {
            name: name.to_owned(),
            url: normalize_url(url).unwrap_or_else(|_| url.to_owned()),
        })
        .collect()
}

/// The first of `remotes` pointing at the same repository as `candidate`, compared by
/// canonical URL. Remotes with unrecognised URLs never match.
pub fn find_remote<'r>(
    candidate: &str,
    remotes: &'r [RemoteSpec],
) -> Result<Option<&'r RemoteSpec>> {
    let wanted = normalize_url(candidate)?;

    let mut matching = remotes
        .iter()
        .filter(|remote| normalize_url(&remote.url).is_ok_and(|url| url == wanted));

    let found = matching.next();
    let duplicates = matching.map(|r| r.name.as_str()).collect::<Vec<_>>();

    if let Some(found) = found {
        if !duplicates.is_empty() {
            warn!(
                "`{wanted}` is connected under several remotes, using `{}` (also: {})",
                found.name,
                duplicates.join(", ")
            );
        }
    }

    Ok(found)
}

pub struct Remotes<'r> {
    repo: &'r Repo,
}

impl<'r> Remotes<'r> {
    pub fn new(repo: &'r Repo) -> Remotes<'r> {
        Remotes { repo }
    }

    pub async fn list_connected(&self) -> Result<Vec<RemoteSpec>> {
        let out = self.repo.output(git::config_matching(REMOTE_URL_KEYS)).await?;

        // 1: no remote configured at all
        match out.status.code() {
            Some(0 | 1) => Ok(parse_remotes(&out.stdout)),
            _ => Err(git::Error {
                step: "config",
                source: shell::Error::Status(out),
            }
            .into()),
        }
    }

    pub async fn find(&self, url: &str) -> Result<Option<RemoteSpec>> {
        let connected = self.list_connected().await?;

        Ok(find_remote(url, &connected)?.cloned())
    }

    pub async fn exists(&self, url: &str) -> Result<bool> {
        Ok(self.find(url).await?.is_some())
    }

    /// Return the remote pointing at `url`, adding one named after the repository if there is
    /// none yet. The remote is added with `url` exactly as given.
    pub async fn ensure(&self, url: &str) -> Result<RemoteSpec> {
        let canonical = normalize_url(url)?;

        if let Some(existing) = self.find(url).await? {
            info!("using existing remote `{}` for `{url}`", existing.name);
            return Ok(existing);
        }

        let name = derive_repo_name(url);

        info!("adding remote `{name}` at `{url}`");
        self.repo
            .run(git::remote(git::Remote(name.as_str()), url))
            .await
            .map_err(|source| {
                Error::or_timeout(source, |source| Error::RemoteRegistrationFailed {
                    name: name.clone(),
                    url: url.to_owned(),
                    source,
                })
            })?;

        Ok(RemoteSpec {
            name,
            url: canonical,
        })
    }
}
