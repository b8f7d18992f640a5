use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No Fusion-DSL with identifier \"{0}\" was found")]
    UnknownDslIdentifier(String),

    #[error("You have to specify either a packageKey or a fusionFile")]
    InvalidTargetSelection,

    #[error("Package {0} is not available")]
    PackageNotFound(String),

    #[error("Fusion path {} is not found", .0.display())]
    FusionDirectoryMissing(PathBuf),

    #[error("File {} is not available", .0.display())]
    FileNotFound(PathBuf),

    #[error("Ejecting Fusion-DSL \"{0}\" was not confirmed")]
    ConfirmationDeclined(String),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailure { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure { path: PathBuf, source: io::Error },

    #[error("Failed to transpile {identifier}`...`: {reason}")]
    TranspileFailure {
        identifier: String,
        reason: crate::transpiler::TranspileError,
    },

    #[error("Invalid Fusion-DSL identifier \"{0}\", expected [a-zA-Z0-9.]+")]
    InvalidIdentifier(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;
