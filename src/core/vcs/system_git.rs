//! System git backend for the release finalize steps
//!
//! Uses the system `git` binary for all operations, with an isolated
//! subprocess environment so user-level config cannot change behavior
//! underneath the release.

use crate::core::error::{GitError, LiftoffError, LiftoffResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  /// Discover the repository containing `path`
  ///
  /// Returns `Ok(None)` when the path is not inside a git repository, which
  /// the pipeline treats as "version control absent" rather than an error.
  pub fn discover(path: &Path) -> LiftoffResult<Option<Self>> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Ok(None);
      }
      return Err(LiftoffError::Git(GitError::CommandFailed {
        command: "git rev-parse --show-toplevel".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(Some(Self {
      repo_path: path.to_path_buf(),
    }))
  }

  /// Check whether the working tree has uncommitted changes
  ///
  /// Queried live, never cached: the answer must reflect the tree at the
  /// moment the release starts.
  pub fn is_dirty(&self) -> LiftoffResult<bool> {
    let output = self
      .git_cmd()
      .args(["status", "--porcelain"])
      .output()
      .context("Failed to run git status")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(LiftoffError::Git(GitError::CommandFailed {
        command: "git status --porcelain".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(!output.stdout.is_empty())
  }

  /// Stage a file
  pub fn stage(&self, path: &str) -> LiftoffResult<()> {
    let output = self
      .git_cmd()
      .args(["add", path])
      .output()
      .context("Failed to run git add")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(LiftoffError::Git(GitError::CommandFailed {
        command: format!("git add {}", path),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Stage a file only if it exists (lockfiles are optional)
  pub fn stage_if_exists(&self, path: &str) -> LiftoffResult<()> {
    if self.repo_path.join(path).exists() {
      self.stage(path)?;
    }
    Ok(())
  }

  /// Create a commit with the given message
  pub fn commit(&self, message: &str) -> LiftoffResult<()> {
    let output = self
      .git_cmd()
      .args(["commit", "-m", message])
      .output()
      .context("Failed to run git commit")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(LiftoffError::Git(GitError::CommandFailed {
        command: "git commit".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Create an annotated tag at HEAD
  pub fn tag_annotated(&self, name: &str, message: &str) -> LiftoffResult<()> {
    let output = self
      .git_cmd()
      .args(["tag", "-a", name, "-m", message])
      .output()
      .context("Failed to run git tag")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(LiftoffError::Git(GitError::CommandFailed {
        command: format!("git tag -a {}", name),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Push the current branch to its upstream
  pub fn push(&self) -> LiftoffResult<()> {
    let output = self.git_cmd().arg("push").output().context("Failed to run git push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(LiftoffError::Git(GitError::PushFailed {
        reason: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Push a single tag to origin
  pub fn push_tag(&self, name: &str) -> LiftoffResult<()> {
    let output = self
      .git_cmd()
      .args(["push", "origin", &format!("refs/tags/{}", name)])
      .output()
      .context("Failed to run git push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(LiftoffError::Git(GitError::PushFailed {
        reason: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the repo path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}
