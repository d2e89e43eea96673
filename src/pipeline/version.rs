//! Version selection: bump class or literal version, chosen once per run

use crate::core::error::{LiftoffError, LiftoffResult, PipelineError};
use crate::ui::prompt::Prompt;

/// The operator's version choice
///
/// A bump class is resolved into a concrete number by `npm version`, never
/// locally; `Literal` strings pass through unvalidated for the same reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
  Patch,
  Minor,
  Major,
  Literal(String),
}

impl VersionSpec {
  /// The argument handed to `npm version`
  pub fn npm_arg(&self) -> &str {
    match self {
      VersionSpec::Patch => "patch",
      VersionSpec::Minor => "minor",
      VersionSpec::Major => "major",
      VersionSpec::Literal(v) => v,
    }
  }

  /// Preview what npm would resolve a bump class to
  ///
  /// Display-only. `Literal` has no preview; the string is shown as-is.
  pub fn preview(&self, current: &semver::Version) -> Option<semver::Version> {
    match self {
      VersionSpec::Patch => Some(semver::Version::new(current.major, current.minor, current.patch + 1)),
      VersionSpec::Minor => Some(semver::Version::new(current.major, current.minor + 1, 0)),
      VersionSpec::Major => Some(semver::Version::new(current.major + 1, 0, 0)),
      VersionSpec::Literal(_) => None,
    }
  }
}

/// Ask the operator for a version bump
///
/// Any answer outside `1`-`4` is fatal. No re-prompt loop: nothing has been
/// mutated yet, so aborting the whole run is the cheapest recovery.
pub fn select_version(prompt: &mut Prompt<'_>, current: &str) -> LiftoffResult<VersionSpec> {
  println!();
  println!("Select version bump (current: {}):", current);

  let parsed = semver::Version::parse(current).ok();
  print_choice(1, "patch", VersionSpec::Patch, parsed.as_ref());
  print_choice(2, "minor", VersionSpec::Minor, parsed.as_ref());
  print_choice(3, "major", VersionSpec::Major, parsed.as_ref());
  println!("  4) custom");

  let choice = prompt.ask("Choice [1-4]:")?;
  match choice.as_str() {
    "1" => Ok(VersionSpec::Patch),
    "2" => Ok(VersionSpec::Minor),
    "3" => Ok(VersionSpec::Major),
    "4" => {
      let version = prompt.ask("Enter version:")?;
      Ok(VersionSpec::Literal(version))
    }
    other => Err(LiftoffError::Pipeline(PipelineError::InvalidSelection {
      input: other.to_string(),
    })),
  }
}

fn print_choice(index: u8, label: &str, spec: VersionSpec, current: Option<&semver::Version>) {
  match current.and_then(|c| spec.preview(c).map(|next| (c, next))) {
    Some((c, next)) => println!("  {}) {}  ({} → {})", index, label, c, next),
    None => println!("  {}) {}", index, label),
  }
}
