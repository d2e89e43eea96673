//! The release pipeline: five strictly ordered stages, fail-fast
//!
//! Preflight, version selection, build & verify, version commit & package,
//! publish & finalize. Every irreversible step sits behind a precondition
//! check or an explicit confirmation gate. Nothing runs concurrently.

pub mod gates;
pub mod preflight;
pub mod version;

use crate::adapters::jsr;
use crate::adapters::npm::{self, Manifest, NpmClient};
use crate::core::error::{LiftoffError, LiftoffResult, PipelineError};
use crate::core::vcs::SystemGit;
use crate::ui::prompt::Prompt;
use gates::{Gate, GateDecision};
use preflight::Preflight;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Outcome of the secondary (JSR) publish stage
///
/// Four distinct states, deliberately not collapsed: `FailedOverridden` and
/// `Published` both let the release proceed but mean different things to the
/// operator reading the final summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryOutcome {
  /// The jsr executable was not on PATH
  Skipped,
  /// jsr publish succeeded
  Published,
  /// jsr publish failed and the operator chose to continue anyway
  FailedOverridden,
  /// jsr publish failed and the operator declined to continue
  Aborted,
}

/// Deletes the release tarball when dropped
///
/// Constructed right after `npm pack` succeeds, so every exit path from that
/// point on, success, fatal error, or declined gate, removes the archive.
/// Deletion failure is logged to stderr and never escalated.
struct ArchiveGuard {
  path: PathBuf,
}

impl ArchiveGuard {
  fn new(path: PathBuf) -> Self {
    Self { path }
  }
}

impl Drop for ArchiveGuard {
  fn drop(&mut self) {
    if self.path.exists() {
      if let Err(e) = std::fs::remove_file(&self.path) {
        eprintln!("⚠️  Failed to remove {}: {}", self.path.display(), e);
      }
    }
  }
}

/// Run the whole release pipeline for the package in `project_dir`
///
/// `input` carries all operator answers; production passes a locked stdin,
/// tests pass a `Cursor`.
pub fn run(project_dir: &Path, input: &mut dyn BufRead) -> LiftoffResult<()> {
  let mut prompt = Prompt::new(input);
  let npm_client = NpmClient::new(project_dir);

  // Stage 1: preflight
  println!("🔍 Running preflight checks...");
  let manifest = Manifest::load(project_dir)?;
  let checks = Preflight::check(&npm_client, project_dir)?;

  if let Some(user) = &checks.authenticated_as {
    println!("✅ Authenticated to npm as {}", user);
  }
  if checks.secondary_tool_available {
    println!("✅ jsr executable found");
  } else {
    println!("ℹ️  jsr not found on PATH, JSR publish will be skipped");
  }
  match checks.working_tree_clean {
    Some(true) => println!("✅ Working tree is clean"),
    Some(false) => {}
    None => println!("ℹ️  No git repository, skipping working tree check"),
  }
  checks.ensure_ready()?;

  // Stage 2: version selection
  let spec = version::select_version(&mut prompt, &manifest.version)?;

  // Stage 3: build & verify, before anything is persisted
  println!("\n📦 Building {}...", manifest.name);
  npm_client.run_build()?;
  println!("✅ Build succeeded");

  if manifest.has_script("test") {
    println!("🔍 Running tests...");
    npm_client.run_test()?;
    println!("✅ Tests passed");
  } else {
    println!("ℹ️  No test script declared, skipping tests");
  }

  // Stage 4: version commit & package
  npm_client.apply_version(spec.npm_arg())?;
  // Read-after-write: npm is the authority on what the bump resolved to
  let manifest = Manifest::load(project_dir)?;
  let version = manifest.version.clone();
  println!("✅ Version bumped to {}", version);

  if jsr::has_descriptor(project_dir) {
    jsr::sync_descriptor(project_dir, &version)?;
    println!("✅ Synced {} to {}", jsr::DESCRIPTOR_FILE, version);
  }

  let packed = npm_client.pack()?;
  let archive = ArchiveGuard::new(project_dir.join(&packed.filename));

  println!("\n📦 Packed {} ({} files):", packed.filename, packed.files.len());
  for file in &packed.files {
    println!("  {}", file);
  }
  println!();

  if gates::confirm(Gate::Publish, &mut prompt)? == GateDecision::Declined {
    return Err(LiftoffError::Pipeline(PipelineError::PublishDeclined));
  }

  // Stage 5: publish & finalize
  println!("\n🚀 Publishing {}@{} to npm...", manifest.name, version);
  npm_client.publish()?;
  println!("✅ Published to npm");

  let secondary = publish_secondary(project_dir, checks.secondary_tool_available, &mut prompt)?;
  if secondary == SecondaryOutcome::Aborted {
    return Err(LiftoffError::Pipeline(PipelineError::SecondaryPublishAborted));
  }

  if let Some(repo) = SystemGit::discover(project_dir)? {
    finalize_vcs(&repo, &version, &mut prompt)?;
  } else {
    println!("ℹ️  No git repository, skipping commit and tag");
  }

  drop(archive);
  println!("\n🎉 Released {}@{}", manifest.name, version);
  Ok(())
}

/// Attempt the JSR publish and classify the outcome
///
/// Never returns an error for the publish itself; a failure flows into the
/// override gate and comes back as `FailedOverridden` or `Aborted`.
fn publish_secondary(
  project_dir: &Path,
  tool_available: bool,
  prompt: &mut Prompt<'_>,
) -> LiftoffResult<SecondaryOutcome> {
  if !tool_available {
    println!("ℹ️  Skipping JSR publish (jsr not installed)");
    return Ok(SecondaryOutcome::Skipped);
  }

  println!("🚀 Publishing to JSR...");
  match jsr::publish(project_dir) {
    Ok(()) => {
      println!("✅ Published to JSR");
      Ok(SecondaryOutcome::Published)
    }
    Err(e) => {
      eprintln!("⚠️  JSR publish failed: {}", e);
      if let Some(help) = e.help_message() {
        eprintln!("💡 Help: {}", help);
      }
      match gates::confirm(Gate::SecondaryOverride, prompt)? {
        GateDecision::Proceed => {
          println!("⚠️  Continuing without the JSR publish");
          Ok(SecondaryOutcome::FailedOverridden)
        }
        GateDecision::Declined => Ok(SecondaryOutcome::Aborted),
      }
    }
  }
}

/// Commit the version bump, tag it, and push behind a gate
///
/// Declining the push is not a failure: the commit and tag stay local and
/// the release still exits successfully.
fn finalize_vcs(repo: &SystemGit, version: &str, prompt: &mut Prompt<'_>) -> LiftoffResult<()> {
  repo.stage(npm::MANIFEST_FILE)?;
  repo.stage_if_exists(npm::LOCKFILE)?;
  repo.stage_if_exists(jsr::DESCRIPTOR_FILE)?;

  let message = format!("Bump version to {}", version);
  repo.commit(&message)?;
  println!("✅ Committed: {}", message);

  let tag = format!("v{}", version);
  repo.tag_annotated(&tag, &tag)?;
  println!("🏷️  Tagged {}", tag);

  if gates::confirm(Gate::Push, prompt)? == GateDecision::Proceed {
    println!("📤 Pushing commit and tag...");
    repo.push()?;
    repo.push_tag(&tag)?;
    println!("✅ Pushed to remote");
  } else {
    println!("ℹ️  Push declined, commit and tag remain local");
  }

  Ok(())
}
