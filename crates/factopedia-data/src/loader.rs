//! Reading payloads and config files from disk.
//!
//! Config files may be RON, TOML or JSON (detected from the extension).
//! Payloads are always JSON and live at `<root>/<regime>/data.json`.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;

/// File name of a regime's payload.
pub const PAYLOAD_FILE: &str = "data.json";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a payload or config file. A failed
/// load never produces a partial catalog.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The payload lacks a section every payload must carry.
    #[error("payload has no '{section}' section")]
    MissingSection { section: &'static str },

    /// A raw record (or raw table) has a shape the catalog can't use.
    #[error("malformed {kind} '{name}': {detail}")]
    MalformedRecord {
        kind: String,
        name: String,
        detail: String,
    },

    /// An in-memory payload failed to deserialize.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Path of the payload for a regime under a data root.
pub fn payload_path(root: &Path, regime: &str) -> PathBuf {
    root.join(regime).join(PAYLOAD_FILE)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Load and build a catalog from a JSON payload file.
///
/// Parse failures are reported against the file; shape problems found while
/// building keep their own variant.
pub fn load_catalog(path: &Path) -> Result<Catalog, DataLoadError> {
    if detect_format(path)? != Format::Json {
        return Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path)?;
    let catalog = Catalog::from_json_slice(&bytes).map_err(|err| match err {
        DataLoadError::Json(e) => DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        },
        other => other,
    })?;
    tracing::info!(path = %path.display(), "payload loaded");
    Ok(catalog)
}
