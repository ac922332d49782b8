use std::{fmt, io, path::StripPrefixError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::properties::BlockId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum NotazaError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Frontmatter error: {0}")]
    Frontmatter(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Malformed outline at line {line}: {message}")]
    MalformedOutline { line: usize, message: String },
    #[error("No block with id {0}")]
    NoSuchBlock(BlockId),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl NotazaError {
    pub fn malformed<S: Into<String>>(line: usize, message: S) -> Self {
        NotazaError::MalformedOutline {
            line,
            message: message.into(),
        }
    }
}

impl From<StripPrefixError> for NotazaError {
    fn from(src: StripPrefixError) -> NotazaError {
        NotazaError::NotFound(format!("Strip prefix failed for path. Error: {src}"))
    }
}

impl From<toml::de::Error> for NotazaError {
    fn from(src: toml::de::Error) -> NotazaError {
        NotazaError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<serde_yaml::Error> for NotazaError {
    fn from(src: serde_yaml::Error) -> NotazaError {
        NotazaError::Frontmatter(format!("YAML deserialization error: {src}"))
    }
}

impl From<walkdir::Error> for NotazaError {
    fn from(src: walkdir::Error) -> NotazaError {
        match src.into_io_error() {
            Some(io_error) => NotazaError::from(io_error),
            None => NotazaError::Io("directory walk failed: filesystem loop".to_string()),
        }
    }
}

impl From<io::Error> for NotazaError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => NotazaError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => NotazaError::PermissionDenied,
            _ => NotazaError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for NotazaError {
    fn from(x: fmt::Error) -> Self {
        NotazaError::Serialization(format!("{x}"))
    }
}
