//! Error types for liftoff with contextual messages and remediation hints
//!
//! This module provides a unified error type that categorizes errors and gives
//! the operator a concrete next step wherever one exists. Release failures are
//! never retried automatically, so the hint channel is the recovery path.

use std::fmt;
use std::io;

/// Main error type for liftoff
#[derive(Debug)]
pub enum LiftoffError {
  /// Release pipeline errors (precondition failures, tool failures, declined gates)
  Pipeline(PipelineError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl LiftoffError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    LiftoffError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    LiftoffError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      LiftoffError::Message { message, context, help } => LiftoffError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      LiftoffError::Pipeline(e) => e.help_message(),
      LiftoffError::Git(e) => e.help_message(),
      LiftoffError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for LiftoffError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LiftoffError::Pipeline(e) => write!(f, "{}", e),
      LiftoffError::Git(e) => write!(f, "{}", e),
      LiftoffError::Io(e) => write!(f, "I/O error: {}", e),
      LiftoffError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for LiftoffError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      LiftoffError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<PipelineError> for LiftoffError {
  fn from(err: PipelineError) -> Self {
    LiftoffError::Pipeline(err)
  }
}

impl From<GitError> for LiftoffError {
  fn from(err: GitError) -> Self {
    LiftoffError::Git(err)
  }
}

impl From<io::Error> for LiftoffError {
  fn from(err: io::Error) -> Self {
    LiftoffError::Io(err)
  }
}

impl From<String> for LiftoffError {
  fn from(msg: String) -> Self {
    LiftoffError::message(msg)
  }
}

impl From<&str> for LiftoffError {
  fn from(msg: &str) -> Self {
    LiftoffError::message(msg)
  }
}

impl From<serde_json::Error> for LiftoffError {
  fn from(err: serde_json::Error) -> Self {
    LiftoffError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for LiftoffError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    LiftoffError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<anyhow::Error> for LiftoffError {
  fn from(err: anyhow::Error) -> Self {
    LiftoffError::message(err.to_string())
  }
}

/// Release pipeline errors
///
/// Every variant is fatal. The pipeline stops where it is; nothing is rolled
/// back except the transient release archive, which is deleted by its guard.
#[derive(Debug)]
pub enum PipelineError {
  /// npm whoami failed or returned nothing
  NotAuthenticated,

  /// The git working tree has uncommitted changes
  DirtyWorkingTree,

  /// The operator answered the bump menu with something other than 1-4
  InvalidSelection { input: String },

  /// The build script failed
  BuildFailed { stderr: String },

  /// The test script failed
  TestFailed { stderr: String },

  /// npm version rejected the requested bump
  BumpFailed { spec: String, stderr: String },

  /// The companion descriptor could not be rewritten
  SyncFailed { reason: String },

  /// npm pack failed or produced unparseable output
  PackFailed { stderr: String },

  /// The operator declined the publish confirmation (a choice, not a tool failure)
  PublishDeclined,

  /// npm publish failed
  PublishFailed { stderr: String },

  /// The JSR publish failed and the operator declined to continue anyway
  SecondaryPublishAborted,
}

impl PipelineError {
  fn help_message(&self) -> Option<String> {
    match self {
      PipelineError::NotAuthenticated => Some("Run `npm login` and try again.".to_string()),
      PipelineError::DirtyWorkingTree => Some(
        "Commit or stash your changes first, so the release commit contains only the version bump.".to_string(),
      ),
      PipelineError::InvalidSelection { .. } => Some("Choose 1, 2, 3, or 4 from the menu.".to_string()),
      PipelineError::BumpFailed { .. } => Some(
        "npm version accepts patch, minor, major, or an exact semver string like 1.2.3.".to_string(),
      ),
      PipelineError::PublishDeclined => Some(
        "The version bump was kept in package.json. Revert it manually if you are not releasing.".to_string(),
      ),
      PipelineError::PublishFailed { .. } => Some(
        "Check your network connection and the npm registry status, then re-run. The version bump is still in place."
          .to_string(),
      ),
      PipelineError::SecondaryPublishAborted => Some(
        "npm publish already succeeded. Publish to JSR manually with `jsr publish`, then commit and tag the bump."
          .to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for PipelineError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PipelineError::NotAuthenticated => {
        write!(f, "Not authenticated to npm (npm whoami failed)")
      }
      PipelineError::DirtyWorkingTree => {
        write!(f, "Working tree has uncommitted changes")
      }
      PipelineError::InvalidSelection { input } => {
        write!(f, "Invalid selection: '{}'", input)
      }
      PipelineError::BuildFailed { stderr } => {
        write!(f, "Build failed:\n{}", stderr)
      }
      PipelineError::TestFailed { stderr } => {
        write!(f, "Tests failed:\n{}", stderr)
      }
      PipelineError::BumpFailed { spec, stderr } => {
        write!(f, "npm version {} failed:\n{}", spec, stderr)
      }
      PipelineError::SyncFailed { reason } => {
        write!(f, "Failed to sync jsr.json: {}", reason)
      }
      PipelineError::PackFailed { stderr } => {
        write!(f, "npm pack failed:\n{}", stderr)
      }
      PipelineError::PublishDeclined => {
        write!(f, "Publish declined, release aborted")
      }
      PipelineError::PublishFailed { stderr } => {
        write!(f, "npm publish failed:\n{}", stderr)
      }
      PipelineError::SecondaryPublishAborted => {
        write!(f, "JSR publish failed and continuing was declined")
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Push failed
  PushFailed { reason: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason } => {
        if reason.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Pull first, then push the release commit and tag manually.".to_string())
        } else {
          Some("The release commit and tag exist locally. Push them manually once the remote is reachable.".to_string())
        }
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::PushFailed { reason } => {
        write!(f, "Push failed: {}", reason)
      }
    }
  }
}

/// Result type alias for liftoff
pub type LiftoffResult<T> = Result<T, LiftoffError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> LiftoffResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> LiftoffResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<LiftoffError>,
{
  fn context(self, ctx: impl Into<String>) -> LiftoffResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> LiftoffResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &LiftoffError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
