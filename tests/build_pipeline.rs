//! End-to-end pipeline tests against a fake cargo executable
//!
//! Each test drops a stub `cargo` script into a temporary bin directory
//! and prepends it to PATH, so the pipeline's spawn/exit-code/publish
//! behavior can be exercised without a real toolchain. PATH mutation is
//! process-global, hence #[serial].

#![cfg(unix)]

use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use addon_build::{
    pipeline, BuildEnv, BuildError, InterruptState, ManifestError, Platform, Profile,
    PublishError, Toolchain,
};

/// Restores the original PATH when dropped, panics included
struct PathGuard(String);

impl Drop for PathGuard {
    fn drop(&mut self) {
        env::set_var("PATH", &self.0);
    }
}

fn prepend_path(dir: &Path) -> PathGuard {
    let orig = env::var("PATH").unwrap_or_default();
    env::set_var("PATH", format!("{}:{}", dir.display(), orig));
    PathGuard(orig)
}

fn path_only(dir: &Path) -> PathGuard {
    let orig = env::var("PATH").unwrap_or_default();
    env::set_var("PATH", dir.display().to_string());
    PathGuard(orig)
}

/// Lay out a fake project plus a stub cargo with the given script body.
/// The stub runs with cwd = native/, like the real invocation. The
/// script may rely only on shell builtins; the output directory it
/// writes into is created here.
fn fake_project(dir: &TempDir, script_body: &str) -> (PathBuf, BuildEnv) {
    let bin = dir.path().join("bin");
    fs::create_dir_all(&bin).unwrap();

    let stub = bin.join("cargo");
    fs::write(&stub, format!("#!/bin/sh\n{}\n", script_body)).unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

    let root = dir.path().join("project");
    fs::create_dir_all(root.join("native/target/debug")).unwrap();
    fs::write(root.join("native/Cargo.toml"), "[lib]\nname = \"demo\"\n").unwrap();

    let env = BuildEnv::new(Platform::Linux, None, &root);
    (bin, env)
}

fn canonical_path(env: &BuildEnv) -> PathBuf {
    env.native_dir().join("index.node")
}

#[test]
#[serial]
fn successful_build_publishes_fresh_artifact() {
    let dir = TempDir::new().unwrap();
    let (bin, env) = fake_project(
        &dir,
        "printf 'fresh build' > target/debug/libdemo.so\nexit 0",
    );
    let _path = prepend_path(&bin);

    // A stale artifact from an earlier build is superseded
    fs::write(canonical_path(&env), b"stale").unwrap();

    pipeline::build(&env, Toolchain::Default, Profile::Debug, None).unwrap();

    assert_eq!(fs::read(canonical_path(&env)).unwrap(), b"fresh build");
}

#[test]
#[serial]
fn nonzero_exit_prevents_publish() {
    let dir = TempDir::new().unwrap();
    let (bin, env) = fake_project(
        &dir,
        "printf 'broken' > target/debug/libdemo.so\nexit 101",
    );
    let _path = prepend_path(&bin);

    fs::write(canonical_path(&env), b"previous").unwrap();

    let result = pipeline::build(&env, Toolchain::Default, Profile::Debug, None);

    assert!(matches!(result, Err(BuildError::BuildFailed { .. })));
    assert_eq!(fs::read(canonical_path(&env)).unwrap(), b"previous");
}

#[test]
#[serial]
fn missing_library_name_fails_before_any_spawn() {
    let dir = TempDir::new().unwrap();
    let (bin, env) = fake_project(&dir, ": > spawn-marker\nexit 0");
    let _path = prepend_path(&bin);

    // Overwrite the manifest with one lacking [lib] name
    fs::write(
        env.manifest_path(),
        "[package]\nname = \"demo-native\"\nversion = \"0.1.0\"\n",
    )
    .unwrap();

    let result = pipeline::build(&env, Toolchain::Default, Profile::Debug, None);

    assert!(matches!(
        result,
        Err(BuildError::Manifest(ManifestError::MissingLibraryName))
    ));
    // The stub never ran
    assert!(!env.native_dir().join("spawn-marker").exists());
}

#[test]
#[serial]
fn silent_toolchain_raises_artifact_not_found() {
    let dir = TempDir::new().unwrap();
    let (bin, env) = fake_project(&dir, "exit 0");
    let _path = prepend_path(&bin);

    fs::write(canonical_path(&env), b"previous").unwrap();

    let result = pipeline::build(&env, Toolchain::Default, Profile::Debug, None);

    assert!(matches!(
        result,
        Err(BuildError::Publish(PublishError::ArtifactNotFound(_)))
    ));
    assert_eq!(fs::read(canonical_path(&env)).unwrap(), b"previous");
}

#[test]
#[serial]
fn interrupt_after_child_aborts_publish() {
    let dir = TempDir::new().unwrap();
    let (bin, env) = fake_project(
        &dir,
        "printf 'fresh build' > target/debug/libdemo.so\nexit 0",
    );
    let _path = prepend_path(&bin);

    let interrupt = InterruptState::new();
    interrupt.handle_signal();

    let result = pipeline::build(&env, Toolchain::Default, Profile::Debug, Some(&interrupt));

    assert!(matches!(result, Err(BuildError::Interrupted)));
    assert!(!canonical_path(&env).exists());
}

#[test]
#[serial]
fn missing_toolchain_reports_spawn_error() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty-bin");
    fs::create_dir_all(&empty).unwrap();

    let root = dir.path().join("project");
    fs::create_dir_all(root.join("native")).unwrap();
    fs::write(root.join("native/Cargo.toml"), "[lib]\nname = \"demo\"\n").unwrap();
    let env = BuildEnv::new(Platform::Linux, None, &root);

    let _path = path_only(&empty);

    let result = pipeline::build(&env, Toolchain::Default, Profile::Debug, None);

    match result {
        Err(BuildError::Spawn { program, .. }) => assert_eq!(program, "cargo"),
        other => panic!("expected spawn error, got {:?}", other.err()),
    }
}
