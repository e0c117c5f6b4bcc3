//! Error types emitted by the Reparto CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use reparto_core::{ErrorKind, SessionError, SqliteStoreError};
use reparto_data::ProviderBuildError;
use reparto_solver::PlanError;
use thiserror::Error;

/// Errors emitted by the Reparto CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The directories for a new database could not be created.
    #[error("failed to prepare database location {path:?}: {source}")]
    PrepareDatabase {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite store failed.
    #[error("failed to open store at {path:?}: {source}")]
    OpenStore {
        path: Utf8PathBuf,
        #[source]
        source: SqliteStoreError,
    },
    /// Opening the import dataset failed.
    #[error("failed to open dataset at {path:?}: {source}")]
    OpenDataset {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Dataset JSON could not be decoded.
    #[error("failed to parse dataset JSON at {path:?}: {source}")]
    ParseDataset {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Writing imported rows failed.
    #[error("failed to import {entity}: {source}")]
    ImportRows {
        entity: &'static str,
        #[source]
        source: SqliteStoreError,
    },
    /// Constructing the OSRM provider failed.
    #[error("failed to build routing provider for {base_url:?}: {source}")]
    BuildRoutingProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Route planning failed.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// A session transition failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl CliError {
    /// Caller-facing category, shared with the library error types.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ArgumentParsing(_)
            | Self::Configuration(_)
            | Self::MissingArgument { .. }
            | Self::MissingSourceFile { .. }
            | Self::SourcePathNotFile { .. }
            | Self::ParseDataset { .. }
            | Self::BuildRoutingProvider { .. } => ErrorKind::InvalidInput,
            Self::InspectSourcePath { .. }
            | Self::PrepareDatabase { .. }
            | Self::OpenStore { .. }
            | Self::OpenDataset { .. }
            | Self::ImportRows { .. }
            | Self::SerializeOutput(_)
            | Self::WriteOutput(_) => ErrorKind::Storage,
            Self::Plan(err) => err.kind(),
            Self::Session(err) => err.kind(),
        }
    }
}
