//! Line-oriented operator prompts
//!
//! All interactive input goes through `Prompt` so the pipeline can be driven
//! from a `Cursor` in tests. EOF yields an empty answer; callers decide
//! whether that means "decline" or "invalid".

use crate::core::error::{LiftoffResult, ResultExt};
use std::io::{BufRead, Write};

/// Blocking line prompt over any buffered reader
pub struct Prompt<'a> {
  input: &'a mut dyn BufRead,
}

impl<'a> Prompt<'a> {
  pub fn new(input: &'a mut dyn BufRead) -> Self {
    Self { input }
  }

  /// Print a message and block for one line of input
  ///
  /// Returns the trimmed answer; an empty string on EOF.
  pub fn ask(&mut self, message: &str) -> LiftoffResult<String> {
    print!("{} ", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    self.input.read_line(&mut line).context("Failed to read input")?;
    Ok(line.trim().to_string())
  }
}
