//! Tool failures at each stage: fail fast, leave the right state behind

use crate::helpers::TestPackage;

#[test]
fn test_build_failure_precedes_version_bump() {
  let pkg = TestPackage::new().unwrap();

  let output = pkg.run("1\n", &[("FAKE_NPM_BUILD_FAILS", "1")]).unwrap();

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Build failed"));
  assert!(stderr.contains("build exploded"));

  // Nothing persisted: the failure came before npm version
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.0");
  let log = pkg.invocation_log().unwrap();
  assert!(!log.contains("npm version"));
  assert!(!log.contains("npm pack"));
}

#[test]
fn test_test_failure_precedes_version_bump() {
  let pkg = TestPackage::new().unwrap();

  let output = pkg.run("1\n", &[("FAKE_NPM_TEST_FAILS", "1")]).unwrap();

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Tests failed"));
  assert!(stderr.contains("2 tests failed"));

  assert_eq!(pkg.manifest_version().unwrap(), "0.1.0");
  let log = pkg.invocation_log().unwrap();
  assert!(log.contains("npm run build"));
  assert!(!log.contains("npm version"));
}

#[test]
fn test_primary_publish_failure_is_fatal_but_cleans_up() {
  let pkg = TestPackage::new().unwrap();

  let output = pkg.run("1\ny\n", &[("FAKE_NPM_PUBLISH_FAILS", "1")]).unwrap();

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("npm publish failed"));
  assert!(stderr.contains("403 Forbidden"));
  // The hint tells the operator the bump survived
  assert!(stderr.contains("version bump is still in place"));

  // Bump kept, no finalize, archive removed
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.1");
  assert_eq!(pkg.head_commit_subject().unwrap(), "Initial package");
  assert!(!pkg.tag_exists("v0.1.1").unwrap());
  assert!(!pkg.archive_exists("widget-0.1.1.tgz"));
}
