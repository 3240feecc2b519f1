//! The native addon build pipeline
//!
//! Linear, no retries, no partial-completion state:
//! read manifest → resolve target → invoke cargo → publish or fail.
//! The child process wait is the only blocking point; its exit code is
//! the sole success signal consumed from the toolchain.

use std::io;
use std::process::ExitStatus;

use crate::artifact::{ArtifactPaths, PublishError, PUBLISH_FILENAME};
use crate::cargo::{cargo_invocation, BuildRequest, Invocation, Profile, Toolchain};
use crate::env::{explicit_target, BuildEnv};
use crate::manifest::{BuildManifest, ManifestError};
use crate::signal::InterruptState;

/// Terminal errors for one build invocation; nothing here is retried
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("cargo build failed: {status}")]
    BuildFailed { status: ExitStatus },

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Build interrupted")]
    Interrupted,
}

/// The cargo invocation `build` would run for this environment, without
/// running it
pub fn plan(env: &BuildEnv, toolchain: Toolchain, profile: Profile) -> Invocation {
    let request = BuildRequest {
        target: explicit_target(env).map(String::from),
        toolchain,
        profile,
    };
    cargo_invocation(env.platform, &request)
}

/// Run one build: invoke the toolchain and publish the artifact
///
/// The manifest is read before anything is spawned, so a missing library
/// name never costs a compile. A non-zero exit, an interrupt, or a
/// missing output file all leave the canonical path exactly as it was.
pub fn build(
    env: &BuildEnv,
    toolchain: Toolchain,
    profile: Profile,
    interrupt: Option<&InterruptState>,
) -> Result<(), BuildError> {
    let native_dir = env.native_dir();
    let manifest = BuildManifest::from_file(&env.manifest_path())?;

    let request = BuildRequest {
        target: explicit_target(env).map(String::from),
        toolchain,
        profile,
    };
    let invocation = cargo_invocation(env.platform, &request);

    println!("running {}", invocation.command_line());

    let status = invocation
        .run_in(&native_dir)
        .map_err(|source| BuildError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

    if let Some(state) = interrupt {
        if state.is_interrupted() {
            return Err(BuildError::Interrupted);
        }
    }

    if !status.success() {
        return Err(BuildError::BuildFailed { status });
    }

    let paths = ArtifactPaths::resolve(
        &native_dir,
        env.platform,
        &manifest.library_name,
        profile,
        request.target.as_deref(),
    );

    println!(
        "generating native{}{}",
        std::path::MAIN_SEPARATOR,
        PUBLISH_FILENAME
    );

    paths.publish()?;
    Ok(())
}
