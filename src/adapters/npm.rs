//! npm client: every interaction with the package manager and its registry
//!
//! liftoff never edits `package.json` by hand. Version bumps go through
//! `npm version` so npm's own validation and formatting rules apply, and the
//! resolved version is always re-read from the manifest afterwards.

use crate::core::error::{LiftoffError, LiftoffResult, PipelineError, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Manifest filename
pub const MANIFEST_FILE: &str = "package.json";

/// Lockfile, staged best-effort during finalize
pub const LOCKFILE: &str = "package-lock.json";

/// package.json structure (minimal fields we care about)
#[derive(Debug, Deserialize, Serialize)]
pub struct Manifest {
  pub name: String,
  pub version: String,
  #[serde(default)]
  pub scripts: HashMap<String, String>,
}

impl Manifest {
  /// Load and parse the manifest from a project directory
  pub fn load(project_dir: &Path) -> LiftoffResult<Self> {
    let path = project_dir.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&path)
      .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
      .map_err(|e| LiftoffError::message(format!("Failed to parse {}: {}", MANIFEST_FILE, e)))
  }

  /// Check whether a named script entry is declared
  pub fn has_script(&self, name: &str) -> bool {
    self.scripts.contains_key(name)
  }
}

/// Deterministic tarball name for a package name and version
///
/// Matches npm's own naming: scoped `@scope/pkg` flattens to `scope-pkg`.
pub fn archive_filename(name: &str, version: &str) -> String {
  let flat = name.trim_start_matches('@').replace('/', "-");
  format!("{}-{}.tgz", flat, version)
}

/// Result of `npm pack`: the tarball name and its member list
#[derive(Debug)]
pub struct PackedArchive {
  pub filename: String,
  /// Member paths, sorted for a stable operator review
  pub files: Vec<String>,
}

/// npm subprocess client, bound to one project directory
pub struct NpmClient {
  project_dir: PathBuf,
}

impl NpmClient {
  pub fn new(project_dir: &Path) -> Self {
    Self {
      project_dir: project_dir.to_path_buf(),
    }
  }

  /// Query the authenticated registry user
  ///
  /// Returns `Ok(None)` when npm reports no login. Never cached; the answer
  /// must be fresh for each run.
  pub fn whoami(&self) -> LiftoffResult<Option<String>> {
    let output = self
      .npm_cmd()
      .arg("whoami")
      .output()
      .context("Failed to execute npm whoami")?;

    if !output.status.success() {
      return Ok(None);
    }

    let user = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if user.is_empty() { Ok(None) } else { Ok(Some(user)) }
  }

  /// Run the build script
  pub fn run_build(&self) -> LiftoffResult<()> {
    let output = self
      .npm_cmd()
      .args(["run", "build"])
      .output()
      .context("Failed to execute npm run build")?;

    if !output.status.success() {
      return Err(LiftoffError::Pipeline(PipelineError::BuildFailed {
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }

  /// Run the test script (callers gate this on `Manifest::has_script("test")`)
  pub fn run_test(&self) -> LiftoffResult<()> {
    let output = self.npm_cmd().arg("test").output().context("Failed to execute npm test")?;

    if !output.status.success() {
      return Err(LiftoffError::Pipeline(PipelineError::TestFailed {
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }

  /// Apply a version bump through `npm version`
  ///
  /// `spec` is a bump class (patch/minor/major) or a literal version string.
  /// Literal validation is npm's job, not ours. `--no-git-tag-version` keeps
  /// commit and tag creation in the finalize stage, behind its own gate.
  pub fn apply_version(&self, spec: &str) -> LiftoffResult<()> {
    let output = self
      .npm_cmd()
      .args(["version", spec, "--no-git-tag-version"])
      .output()
      .context("Failed to execute npm version")?;

    if !output.status.success() {
      return Err(LiftoffError::Pipeline(PipelineError::BumpFailed {
        spec: spec.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }

  /// Create the release tarball and enumerate its members
  pub fn pack(&self) -> LiftoffResult<PackedArchive> {
    let output = self
      .npm_cmd()
      .args(["pack", "--json"])
      .output()
      .context("Failed to execute npm pack")?;

    if !output.status.success() {
      return Err(LiftoffError::Pipeline(PipelineError::PackFailed {
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_pack_output(&stdout)
  }

  /// Publish to the npm registry
  pub fn publish(&self) -> LiftoffResult<()> {
    let output = self
      .npm_cmd()
      .arg("publish")
      .output()
      .context("Failed to execute npm publish")?;

    if !output.status.success() {
      return Err(LiftoffError::Pipeline(PipelineError::PublishFailed {
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }

  fn npm_cmd(&self) -> Command {
    let mut cmd = Command::new("npm");
    cmd.current_dir(&self.project_dir);
    cmd
  }
}

/// Parse `npm pack --json` output into a `PackedArchive`
fn parse_pack_output(stdout: &str) -> LiftoffResult<PackedArchive> {
  let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).map_err(|e| {
    LiftoffError::Pipeline(PipelineError::PackFailed {
      stderr: format!("unparseable npm pack output: {}", e),
    })
  })?;

  let entry = parsed.as_array().and_then(|a| a.first()).ok_or_else(|| {
    LiftoffError::Pipeline(PipelineError::PackFailed {
      stderr: "npm pack --json returned no entries".to_string(),
    })
  })?;

  let filename = entry
    .get("filename")
    .and_then(|v| v.as_str())
    .ok_or_else(|| {
      LiftoffError::Pipeline(PipelineError::PackFailed {
        stderr: "npm pack --json entry has no filename".to_string(),
      })
    })?
    .to_string();

  let mut files: Vec<String> = entry
    .get("files")
    .and_then(|v| v.as_array())
    .map(|entries| {
      entries
        .iter()
        .filter_map(|f| f.get("path").and_then(|p| p.as_str()))
        .map(|p| p.to_string())
        .collect()
    })
    .unwrap_or_default();
  files.sort();

  Ok(PackedArchive { filename, files })
}
