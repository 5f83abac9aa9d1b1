use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Format tag attached to every discovered file.
///
/// The set of formats is closed: adding support for a new kind of
/// configuration file means adding a variant here plus its extraction
/// function in `model::build`, never touching the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFormat {
    /// CI workflow definition (YAML).
    Workflow,
    /// Dependency manifest (JSON, `require`/`require-dev` schema subset).
    Manifest,
    /// Configuration file of an external tool, tagged with the tool name.
    ToolConfig { tool: String },
}

/// One input file, as handed to the core by the discovery layer.
///
/// Bytes are read by the caller; the core never touches the filesystem.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub format: FileFormat,
    pub bytes: Vec<u8>,
}

impl DiscoveredFile {
    pub fn new(path: impl Into<PathBuf>, format: FileFormat, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            format,
            bytes: bytes.into(),
        }
    }
}

/// A syntactically invalid input file.
///
/// Recorded, never fatal: the file's facts are simply absent from the model.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{}: {reason}", path.display())]
pub struct ParseError {
    pub path: PathBuf,
    pub reason: String,
}

/// Generic structured value per supported format, before any typed
/// extraction. Parsers stop here; shape interpretation belongs to the
/// model builder.
#[derive(Debug, Clone)]
pub enum RawDocument {
    Workflow(serde_yaml::Value),
    Manifest(serde_json::Value),
    ToolConfig {
        tool: String,
        value: serde_yaml::Value,
    },
}

/// Parse raw bytes according to the file's format tag.
///
/// Tolerant of unknown fields by construction (the output is a generic
/// value tree); fails only on syntactically invalid input.
pub fn parse(file: &DiscoveredFile) -> Result<RawDocument, ParseError> {
    match &file.format {
        FileFormat::Workflow => {
            let value: serde_yaml::Value =
                serde_yaml::from_slice(&file.bytes).map_err(|e| ParseError {
                    path: file.path.clone(),
                    reason: e.to_string(),
                })?;
            Ok(RawDocument::Workflow(value))
        }
        FileFormat::Manifest => {
            let value: serde_json::Value =
                serde_json::from_slice(&file.bytes).map_err(|e| ParseError {
                    path: file.path.clone(),
                    reason: e.to_string(),
                })?;
            Ok(RawDocument::Manifest(value))
        }
        FileFormat::ToolConfig { tool } => {
            // Tool configs (e.g. phpstan.neon) are close enough to YAML for
            // the version-field extraction we need; anything beyond that is
            // retained as an opaque value.
            let value: serde_yaml::Value =
                serde_yaml::from_slice(&file.bytes).map_err(|e| ParseError {
                    path: file.path.clone(),
                    reason: e.to_string(),
                })?;
            Ok(RawDocument::ToolConfig {
                tool: tool.clone(),
                value,
            })
        }
    }
}
