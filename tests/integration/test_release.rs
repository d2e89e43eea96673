//! End-to-end release scenarios against the fake registry tools

use crate::helpers::{TestPackage, git, stdout_of};

#[test]
fn test_patch_release_with_declined_push() {
  let pkg = TestPackage::new().unwrap();

  // 1 = patch, y = publish, n = don't push
  let output = pkg.run("1\ny\nn\n", &[]).unwrap();

  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.1");
  assert_eq!(pkg.head_commit_subject().unwrap(), "Bump version to 0.1.1");
  assert!(pkg.tag_exists("v0.1.1").unwrap());
  assert!(!pkg.archive_exists("widget-0.1.1.tgz"));

  let log = pkg.invocation_log().unwrap();
  assert!(log.contains("npm run build"));
  assert!(log.contains("npm test"));
  assert!(log.contains("npm version patch --no-git-tag-version"));
  assert!(log.contains("npm pack --json"));
  assert!(log.contains("npm publish"));

  let stdout = stdout_of(&output);
  assert!(stdout.contains("Released widget@0.1.1"));
  assert!(stdout.contains("commit and tag remain local"));
}

#[test]
fn test_minor_and_major_selections() {
  let pkg = TestPackage::new().unwrap();
  let output = pkg.run("2\ny\nn\n", &[]).unwrap();
  assert!(output.status.success());
  assert_eq!(pkg.manifest_version().unwrap(), "0.2.0");
  assert!(pkg.tag_exists("v0.2.0").unwrap());

  let pkg = TestPackage::new().unwrap();
  let output = pkg.run("3\ny\nn\n", &[]).unwrap();
  assert!(output.status.success());
  assert_eq!(pkg.manifest_version().unwrap(), "1.0.0");
  assert!(pkg.tag_exists("v1.0.0").unwrap());
}

#[test]
fn test_custom_version_release() {
  let pkg = TestPackage::new().unwrap();

  let output = pkg.run("4\n2.0.0-rc.1\ny\nn\n", &[]).unwrap();

  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
  assert_eq!(pkg.manifest_version().unwrap(), "2.0.0-rc.1");
  assert_eq!(pkg.head_commit_subject().unwrap(), "Bump version to 2.0.0-rc.1");
  assert!(pkg.tag_exists("v2.0.0-rc.1").unwrap());
  assert!(!pkg.archive_exists("widget-2.0.0-rc.1.tgz"));
}

#[test]
fn test_malformed_custom_version_fails_before_pack() {
  let pkg = TestPackage::new().unwrap();

  let output = pkg.run("4\nbananas\n", &[]).unwrap();

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("npm version bananas failed"));

  let log = pkg.invocation_log().unwrap();
  assert!(!log.contains("npm pack"));
  assert!(!log.contains("npm publish"));
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.0");
  assert_eq!(pkg.head_commit_subject().unwrap(), "Initial package");
}

#[test]
fn test_declined_publish_keeps_bump_and_cleans_archive() {
  let pkg = TestPackage::new().unwrap();

  let output = pkg.run("1\nn\n", &[]).unwrap();

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("declined"));

  // The bump persists; nothing downstream of the gate ran
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.1");
  assert_eq!(pkg.head_commit_subject().unwrap(), "Initial package");
  assert!(!pkg.tag_exists("v0.1.1").unwrap());
  assert!(!pkg.archive_exists("widget-0.1.1.tgz"));

  let log = pkg.invocation_log().unwrap();
  assert!(!log.contains("npm publish"));
}

#[test]
fn test_missing_test_script_skips_tests() {
  let pkg = TestPackage::new().unwrap();
  pkg
    .write_manifest(
      r#"{
  "name": "widget",
  "version": "0.1.0",
  "scripts": {
    "build": "tsc"
  }
}
"#,
    )
    .unwrap();

  let output = pkg.run("1\ny\nn\n", &[]).unwrap();

  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
  assert!(stdout_of(&output).contains("No test script"));

  let log = pkg.invocation_log().unwrap();
  assert!(log.contains("npm run build"));
  assert!(!log.contains("npm test"));
}

#[test]
fn test_release_without_git_repository() {
  let pkg = TestPackage::without_git().unwrap();

  // No repository: no tree check, no commit, no push gate
  let output = pkg.run("1\ny\n", &[]).unwrap();

  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
  assert_eq!(pkg.manifest_version().unwrap(), "0.1.1");
  assert!(!pkg.archive_exists("widget-0.1.1.tgz"));

  let stdout = stdout_of(&output);
  assert!(stdout.contains("No git repository"));
  assert!(stdout.contains("Released widget@0.1.1"));
}

#[test]
fn test_accepted_push_reaches_remote() {
  let pkg = TestPackage::new().unwrap();
  let remote = pkg.add_remote().unwrap();

  let output = pkg.run("1\ny\ny\n", &[]).unwrap();
  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

  let tags = git(&remote, &["tag", "-l", "v0.1.1"]).unwrap();
  assert_eq!(String::from_utf8_lossy(&tags.stdout).trim(), "v0.1.1");

  let subject = git(&remote, &["log", "-1", "--format=%s", "main"]).unwrap();
  assert_eq!(String::from_utf8_lossy(&subject.stdout).trim(), "Bump version to 0.1.1");
}

#[test]
fn test_scoped_package_archive_name() {
  let pkg = TestPackage::new().unwrap();
  pkg
    .write_manifest(
      r#"{
  "name": "@acme/widget",
  "version": "1.2.2",
  "scripts": {
    "build": "tsc"
  }
}
"#,
    )
    .unwrap();

  let output = pkg.run("1\ny\nn\n", &[]).unwrap();

  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
  assert_eq!(pkg.manifest_version().unwrap(), "1.2.3");
  assert!(stdout_of(&output).contains("acme-widget-1.2.3.tgz"));
  assert!(!pkg.archive_exists("acme-widget-1.2.3.tgz"));
}
