//! Artifact discovery and publish to the canonical load point
//!
//! The managed runtime loads the native module from exactly one path,
//! `native/index.node`, regardless of profile or target. Publishing
//! replaces whatever is there with the freshly built library; the path
//! holds either the previous complete artifact or the new one, never a
//! partial file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cargo::Profile;
use crate::platform::Platform;

/// Fixed filename the runtime loads, inside the native directory
pub const PUBLISH_FILENAME: &str = "index.node";

/// Errors from the publish step
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The toolchain reported success but the expected output file is
    /// missing: a convention mismatch, never silently ignored.
    #[error("Expected build artifact not found at {0}")]
    ArtifactNotFound(PathBuf),

    #[error("Failed to publish artifact: {0}")]
    Io(#[from] io::Error),
}

/// Where the compiled library lands and where it gets published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Compiled shared library under the toolchain's output layout:
    /// `native/target/[<target>/]<profile>/<prefix><name><suffix>`
    pub built: PathBuf,
    /// Canonical publish path the runtime loads: `native/index.node`
    pub canonical: PathBuf,
}

impl ArtifactPaths {
    /// Compute both paths for one completed build
    pub fn resolve(
        native_dir: &Path,
        platform: Platform,
        library_name: &str,
        profile: Profile,
        target: Option<&str>,
    ) -> Self {
        let mut output_dir = native_dir.join("target");
        if let Some(target) = target {
            output_dir.push(target);
        }
        output_dir.push(profile.dir_name());

        Self {
            built: output_dir.join(platform.library_filename(library_name)),
            canonical: native_dir.join(PUBLISH_FILENAME),
        }
    }

    /// Replace the canonical artifact with the freshly built one
    ///
    /// Checks the built artifact exists before touching the canonical
    /// path, so a missing artifact leaves the previous publish intact.
    /// Removal of the old file is idempotent; a failed copy removes its
    /// partial output rather than leaving it to be mistaken for valid.
    pub fn publish(&self) -> Result<(), PublishError> {
        if !self.built.is_file() {
            return Err(PublishError::ArtifactNotFound(self.built.clone()));
        }

        match fs::remove_file(&self.canonical) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(PublishError::Io(e)),
        }

        if let Err(e) = fs::copy(&self.built, &self.canonical) {
            let _ = fs::remove_file(&self.canonical);
            return Err(PublishError::Io(e));
        }

        Ok(())
    }
}
