//! Transpilers turn the code body of one DSL call-site into plain Fusion.
//!
//! Every variant implements [`Transpiler`]. The rewrite engine only sees the
//! trait object handed out by the [`TranspilerRegistry`], so new variants are
//! added here and in [`crate::config::TranspilerDescriptor`] without touching
//! the engine.
//!
//! A transpiler must be a pure function of its input: the same code body
//! always yields the same Fusion text. The preview shown by `simulate` is
//! only worth something if `eject` then writes exactly that.

pub mod command;
pub mod registry;
pub mod template;

use mockall::automock;
use std::{io, sync::Arc};
use thiserror::Error;

use crate::config::TranspilerDescriptor;

pub use command::CommandTranspiler;
pub use registry::TranspilerRegistry;
pub use template::TemplateTranspiler;

#[derive(Error, Debug)]
pub enum TranspileError {
    #[error("failed to start `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("I/O error while talking to `{program}`: {source}")]
    Io { program: String, source: io::Error },

    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("`{program}` produced output that is not UTF-8")]
    InvalidOutput { program: String },
}

pub type TranspileResult<T> = Result<T, TranspileError>;

#[automock]
pub trait Transpiler: Send + Sync {
    /// Converts one DSL code body into Fusion code.
    fn transpile(&self, code: &str) -> TranspileResult<String>;
}

/// Builds the transpiler a settings entry describes.
pub fn create_transpiler(descriptor: &TranspilerDescriptor) -> Arc<dyn Transpiler> {
    match descriptor {
        TranspilerDescriptor::Template { template, escape } => {
            Arc::new(TemplateTranspiler::new(template.clone(), *escape))
        }
        TranspilerDescriptor::Command {
            program,
            args,
            trim_trailing_newline,
        } => Arc::new(
            CommandTranspiler::new(program.clone(), args.clone())
                .with_trim_trailing_newline(*trim_trailing_newline),
        ),
    }
}
