//! JSR adapter: secondary registry detection, descriptor sync, and publish
//!
//! JSR is optional end to end. The executable is presence-detected once per
//! run; when absent the secondary publish is skipped with a notice, never an
//! error. The `jsr.json` descriptor, when present, must mirror the manifest
//! version or downstream consumers would see a stale release.

use crate::core::error::{LiftoffError, LiftoffResult, PipelineError, ResultExt};
use std::path::Path;
use std::process::Command;

/// Companion descriptor filename
pub const DESCRIPTOR_FILE: &str = "jsr.json";

/// Executable name looked up on PATH
const JSR_BIN: &str = "jsr";

/// Check whether the `jsr` executable is available
///
/// A pure PATH scan: same environment, same answer.
pub fn detect() -> bool {
  match std::env::var_os("PATH") {
    Some(path) => detect_in(&path),
    None => false,
  }
}

fn detect_in(path_var: &std::ffi::OsStr) -> bool {
  std::env::split_paths(path_var).any(|dir| {
    let candidate = dir.join(JSR_BIN);
    if candidate.is_file() {
      return true;
    }
    if cfg!(windows) {
      return dir.join(format!("{}.cmd", JSR_BIN)).is_file() || dir.join(format!("{}.exe", JSR_BIN)).is_file();
    }
    false
  })
}

/// Check whether the project carries a companion descriptor
pub fn has_descriptor(project_dir: &Path) -> bool {
  project_dir.join(DESCRIPTOR_FILE).exists()
}

/// Regenerate the descriptor's version field from the manifest's version
///
/// A serde round-trip, never a textual patch: the descriptor is re-emitted
/// from parsed content with only the version replaced.
pub fn sync_descriptor(project_dir: &Path, version: &str) -> LiftoffResult<()> {
  let path = project_dir.join(DESCRIPTOR_FILE);
  let content = std::fs::read_to_string(&path).map_err(|e| {
    LiftoffError::Pipeline(PipelineError::SyncFailed {
      reason: format!("cannot read {}: {}", path.display(), e),
    })
  })?;

  let mut descriptor: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
    LiftoffError::Pipeline(PipelineError::SyncFailed {
      reason: format!("cannot parse {}: {}", DESCRIPTOR_FILE, e),
    })
  })?;

  match descriptor.as_object_mut() {
    Some(obj) => {
      obj.insert("version".to_string(), serde_json::Value::String(version.to_string()));
    }
    None => {
      return Err(LiftoffError::Pipeline(PipelineError::SyncFailed {
        reason: format!("{} is not a JSON object", DESCRIPTOR_FILE),
      }));
    }
  }

  let serialized = serde_json::to_string_pretty(&descriptor).map_err(|e| {
    LiftoffError::Pipeline(PipelineError::SyncFailed {
      reason: format!("cannot serialize {}: {}", DESCRIPTOR_FILE, e),
    })
  })?;

  std::fs::write(&path, serialized + "\n").map_err(|e| {
    LiftoffError::Pipeline(PipelineError::SyncFailed {
      reason: format!("cannot write {}: {}", path.display(), e),
    })
  })?;

  Ok(())
}

/// Publish to JSR
///
/// `--allow-dirty` is required, not incidental: the version bump sits
/// uncommitted in the working tree until the finalize stage commits it.
pub fn publish(project_dir: &Path) -> LiftoffResult<()> {
  let output = Command::new(JSR_BIN)
    .current_dir(project_dir)
    .args(["publish", "--allow-dirty"])
    .output()
    .context("Failed to execute jsr publish")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    return Err(LiftoffError::with_help(
      format!("jsr publish failed:\n{}", stderr),
      "Check that jsr.json has a valid name/version/exports and that you are logged in to JSR.",
    ));
  }

  Ok(())
}
