//! Confirmation gates: the three points where the operator must say yes
//!
//! Each gate is its own variant so the abort semantics stay explicit at the
//! call site: declining Publish aborts the release, declining
//! SecondaryOverride aborts after an irreversible npm publish, declining
//! Push just leaves the commit and tag local.

use crate::core::error::LiftoffResult;
use crate::ui::prompt::Prompt;

/// A point in the pipeline requiring explicit affirmative input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
  /// Before npm publish, after the archive review
  Publish,
  /// After a failed JSR publish: continue anyway?
  SecondaryOverride,
  /// After commit and tag: push to the remote?
  Push,
}

impl Gate {
  fn prompt_text(&self) -> &'static str {
    match self {
      Gate::Publish => "Publish to npm? [y/N]:",
      Gate::SecondaryOverride => "Continue without the JSR publish? [y/N]:",
      Gate::Push => "Push commit and tag to the remote? [y/N]:",
    }
  }
}

/// The operator's answer at a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
  Proceed,
  Declined,
}

/// Block on one line of input; only `y` or `Y` proceeds
///
/// Anything else, including EOF, declines. No default, no timeout.
pub fn confirm(gate: Gate, prompt: &mut Prompt<'_>) -> LiftoffResult<GateDecision> {
  let answer = prompt.ask(gate.prompt_text())?;
  if answer == "y" || answer == "Y" {
    Ok(GateDecision::Proceed)
  } else {
    Ok(GateDecision::Declined)
  }
}
