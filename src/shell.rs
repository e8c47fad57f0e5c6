use std::future::Future;
use std::io;
use std::process::{self, Stdio};
use std::str;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    IO(#[from] io::Error),
    #[error("non-zero exit code: {} {}", .0.status, .0.stderr.trim_end())]
    Status(Output),
    #[error("invalid UTF8: {0}")]
    Utf8(#[from] str::Utf8Error),
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug)]
pub struct Output {
    pub status: process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl TryFrom<process::Output> for Output {
    type Error = str::Utf8Error;

    fn try_from(out: process::Output) -> Result<Self, Self::Error> {
        let stdout = str::from_utf8(out.stdout.as_slice())?;
        let stdout = stdout.trim_end().to_string();

        Ok(Output {
            status: out.status,
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            stdout,
        })
    }
}

/// One line of output read from a running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Stdout(String),
    Stderr(String),
}

/// Exit status and collected stderr of a process whose output was streamed.
#[derive(Debug)]
pub struct Streamed {
    pub status: process::ExitStatus,
    pub stderr: Vec<String>,
}

fn piped(cmd: &mut Command) {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
}

async fn bounded<F: Future>(timeout: Option<Duration>, fut: F) -> Result<F::Output, Error> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::TimedOut(limit)),
        None => Ok(fut.await),
    }
}

/// Spawn `cmd` and collect its output, whatever its exit status.
///
/// When `timeout` elapses the child is killed and [`Error::TimedOut`] is returned.
pub async fn output(mut cmd: Command, timeout: Option<Duration>) -> Result<Output, Error> {
    piped(&mut cmd);

    let child = cmd.spawn()?;
    let out = bounded(timeout, child.wait_with_output()).await??;

    Ok(out.try_into()?)
}

/// Like [`output`], but a non-zero exit code is an [`Error::Status`].
pub async fn run(cmd: Command, timeout: Option<Duration>) -> Result<Output, Error> {
    let output = output(cmd, timeout).await?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(Error::Status(output))
    }
}

/// Spawn `cmd` and hand every line it prints to `on_line` as soon as it is read, until the
/// process exits. Both streams are drained concurrently so neither pipe can fill up and block
/// the child.
pub async fn stream<F>(
    mut cmd: Command,
    timeout: Option<Duration>,
    mut on_line: F,
) -> Result<Streamed, Error>
where
    F: FnMut(Line),
{
    piped(&mut cmd);

    let mut child = cmd.spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("child stderr was not captured"))?;

    let work = async {
        let mut out = BufReader::new(stdout).lines();
        let mut err = BufReader::new(stderr).lines();
        let (mut out_done, mut err_done) = (false, false);
        let mut collected = Vec::new();

        while !(out_done && err_done) {
            tokio::select! {
                line = out.next_line(), if !out_done => match line? {
                    Some(line) => on_line(Line::Stdout(line)),
                    None => out_done = true,
                },
                line = err.next_line(), if !err_done => match line? {
                    Some(line) => {
                        collected.push(line.clone());
                        on_line(Line::Stderr(line));
                    }
                    None => err_done = true,
                },
            }
        }

        let status = child.wait().await?;

        Ok::<_, Error>(Streamed {
            status,
            stderr: collected,
        })
    };

    bounded(timeout, work).await?
}
