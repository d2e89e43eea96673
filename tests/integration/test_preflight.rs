//! Preflight and version-selector failures: nothing may be mutated

use crate::helpers::{TestPackage, stderr_of};

#[test]
fn test_unauthenticated_fails_before_any_prompt() {
  let pkg = TestPackage::new().unwrap();

  // No stdin at all: the run must fail before ever asking a question
  let output = pkg.run("", &[("FAKE_NPM_UNAUTHENTICATED", "1")]).unwrap();

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Not authenticated"));
  assert!(stderr_of(&output).contains("npm login"));

  let log = pkg.invocation_log().unwrap();
  assert!(log.contains("npm whoami"));
  assert!(!log.contains("npm version"));
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.0");
}

#[test]
fn test_dirty_working_tree_fails_before_selector() {
  let pkg = TestPackage::new().unwrap();
  pkg.dirty().unwrap();

  let output = pkg.run("1\n", &[]).unwrap();

  assert!(!output.status.success());
  assert!(stderr_of(&output).contains("uncommitted changes"));

  let log = pkg.invocation_log().unwrap();
  assert!(!log.contains("npm run build"));
  assert!(!log.contains("npm version"));
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.0");
}

#[test]
fn test_invalid_selection_is_fatal() {
  let pkg = TestPackage::new().unwrap();

  let output = pkg.run("9\n", &[]).unwrap();

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Invalid selection"));
  assert!(stderr_of(&output).contains("'9'"));

  let log = pkg.invocation_log().unwrap();
  assert!(!log.contains("npm version"));
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.0");
}

#[test]
fn test_eof_at_selector_is_invalid_selection_not_hang() {
  let pkg = TestPackage::new().unwrap();

  let output = pkg.run("", &[]).unwrap();

  assert!(!output.status.success());
  assert!(stderr_of(&output).contains("Invalid selection"));
}
