//! addon-build - native addon build pipeline
//!
//! Builds the Rust crate under `native/` of a hybrid Node.js project by
//! invoking the cargo toolchain and publishes the compiled shared
//! library at `native/index.node`, the single path the runtime loads it
//! from at start-up.

pub mod artifact;
pub mod cargo;
pub mod env;
pub mod manifest;
pub mod pipeline;
pub mod platform;
pub mod signal;

pub use artifact::{ArtifactPaths, PublishError, PUBLISH_FILENAME};
pub use cargo::{cargo_invocation, BuildRequest, Invocation, Profile, Toolchain};
pub use env::{explicit_target, BuildEnv, ARCH_OVERRIDE_VAR};
pub use manifest::{BuildManifest, ManifestError};
pub use pipeline::{build, plan, BuildError};
pub use platform::{LibConvention, Platform};
pub use signal::{InterruptGuard, InterruptState, EXIT_CODE_INTERRUPTED};
