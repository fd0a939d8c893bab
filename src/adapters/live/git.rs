//! Live git adapter using `git` CLI commands.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::UpstreamRef;
use crate::ports::git::{GitRemote, GitRepo};

/// Live git adapter that shells out to the `git` CLI.
pub struct LiveGitRepo;

fn git(root: &Path, args: &[&str]) -> Result<Output, Box<dyn std::error::Error + Send + Sync>> {
    Ok(Command::new("git").arg("-C").arg(root).args(args).output()?)
}

fn failure(args: &[&str], output: &Output) -> Box<dyn std::error::Error + Send + Sync> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("git {} failed: {}", args.join(" "), stderr.trim()).into()
}

/// Parses `git remote -v` output, keeping one entry per fetch URL.
fn parse_remotes(stdout: &str) -> Vec<GitRemote> {
    stdout
        .lines()
        .filter(|line| line.ends_with("(fetch)"))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let url = fields.next()?;
            Some(GitRemote { name: name.to_string(), url: url.to_string() })
        })
        .collect()
}

/// Runs a git query where exit code 1 means "not set".
fn optional_value(
    root: &Path,
    args: &[&str],
) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
    let output = git(root, args)?;
    match output.status.code() {
        Some(0) => Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string())),
        Some(1) => Ok(None),
        _ => Err(failure(args, &output)),
    }
}

impl GitRepo for LiveGitRepo {
    fn remotes(
        &self,
        root: &Path,
    ) -> Result<Vec<GitRemote>, Box<dyn std::error::Error + Send + Sync>> {
        let args = ["remote", "-v"];
        let output = git(root, &args)?;
        if !output.status.success() {
            return Err(failure(&args, &output));
        }
        Ok(parse_remotes(&String::from_utf8_lossy(&output.stdout)))
    }

    fn current_branch(
        &self,
        root: &Path,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        optional_value(root, &["symbolic-ref", "--quiet", "--short", "HEAD"])
    }

    fn upstream(
        &self,
        root: &Path,
        branch: &str,
    ) -> Result<Option<UpstreamRef>, Box<dyn std::error::Error + Send + Sync>> {
        let remote_key = format!("branch.{branch}.remote");
        let merge_key = format!("branch.{branch}.merge");
        let Some(remote) = optional_value(root, &["config", "--get", &remote_key])? else {
            return Ok(None);
        };
        let Some(merge) = optional_value(root, &["config", "--get", &merge_key])? else {
            return Ok(None);
        };
        let branch = merge.strip_prefix("refs/heads/").unwrap_or(&merge).to_string();
        Ok(Some(UpstreamRef { remote, branch }))
    }

    fn remote_branch_exists(
        &self,
        root: &Path,
        upstream: &UpstreamRef,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let reference = format!("refs/remotes/{}/{}", upstream.remote, upstream.branch);
        let found = optional_value(root, &["rev-parse", "--verify", "--quiet", &reference])?;
        Ok(found.is_some())
    }
}
