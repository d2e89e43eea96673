//! Preflight: live environment checks before anything is mutated

use crate::adapters::{jsr, npm::NpmClient};
use crate::core::error::{LiftoffError, LiftoffResult, PipelineError};
use crate::core::vcs::SystemGit;
use std::path::Path;

/// A fresh snapshot of the release preconditions
///
/// Each field is an independent observation; enforcement lives in
/// [`Preflight::ensure_ready`]. Nothing here is cached across runs.
#[derive(Debug)]
pub struct Preflight {
  /// The npm user, when authenticated
  pub authenticated_as: Option<String>,
  /// Whether the `jsr` executable was found on PATH
  pub secondary_tool_available: bool,
  /// `None` when no git repository is present (vacuously clean)
  pub working_tree_clean: Option<bool>,
}

impl Preflight {
  /// Query registry auth, secondary tool presence, and working tree state
  pub fn check(npm: &NpmClient, project_dir: &Path) -> LiftoffResult<Self> {
    let authenticated_as = npm.whoami()?;
    let secondary_tool_available = jsr::detect();

    let working_tree_clean = match SystemGit::discover(project_dir)? {
      Some(repo) => Some(!repo.is_dirty()?),
      None => None,
    };

    Ok(Self {
      authenticated_as,
      secondary_tool_available,
      working_tree_clean,
    })
  }

  /// Enforce the fatal preconditions, in order
  ///
  /// Auth first, then tree cleanliness. The cleanliness check must pass
  /// before any version bump so the eventual release commit contains the
  /// version change and nothing else.
  pub fn ensure_ready(&self) -> LiftoffResult<()> {
    if self.authenticated_as.is_none() {
      return Err(LiftoffError::Pipeline(PipelineError::NotAuthenticated));
    }
    if self.working_tree_clean == Some(false) {
      return Err(LiftoffError::Pipeline(PipelineError::DirtyWorkingTree));
    }
    Ok(())
  }
}
