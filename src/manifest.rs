//! Build manifest reader for the native crate (native/Cargo.toml)
//!
//! The only fact the pipeline needs from the manifest is the declared
//! library name: it determines the filename the toolchain will produce.
//! The manifest is read fresh on every invocation, never cached.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// Error types for manifest operations
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cargo.toml does not contain a [lib] section with a 'name' field")]
    MissingLibraryName,
}

/// Raw shape of the fields we care about; everything else is ignored
#[derive(Debug, Deserialize)]
struct RawManifest {
    lib: Option<LibSection>,
}

#[derive(Debug, Deserialize)]
struct LibSection {
    name: Option<String>,
}

/// Parsed build manifest of the native crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildManifest {
    /// Declared `[lib] name`; dictates the compiled artifact's filename
    pub library_name: String,
}

impl BuildManifest {
    /// Load and parse the manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse the manifest from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(s)?;

        let library_name = raw
            .lib
            .and_then(|lib| lib.name)
            .filter(|name| !name.is_empty())
            .ok_or(ManifestError::MissingLibraryName)?;

        Ok(Self { library_name })
    }
}
