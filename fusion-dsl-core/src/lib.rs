//! # Fusion DSL Explorer
//!
//! Fusion files may embed fragments of other languages through Fusion-DSL
//! expressions, an identifier followed by a backtick-quoted body:
//!
//! ```text
//! renderer = afx`<div>{props.title}</div>`
//! ```
//!
//! This crate finds those expressions and expands the ones of a chosen DSL
//! into plain Fusion, either as a preview (`simulate`) or by rewriting the
//! files in place (`eject`). Ejecting every usage of a DSL is what makes it
//! possible to drop the package that provides it.
//!
//! ## Pipeline
//!
//! ```text
//! ModeController → RewriteEngine → ExpressionLocator
//!                                → TranspilerRegistry → Transpiler
//!                → DiffPresenter → stdout / file
//! ```
//!
//! * [`locator`]: finds call-sites in raw text, independent of any registry
//! * [`transpiler`]: the [`transpiler::Transpiler`] trait, its variants and the registry
//! * [`rewrite`]: substitutes the call-sites of one identifier
//! * [`diff`]: unified diff or full text for review
//! * [`controller`]: validation, target resolution, the eject confirmation
//!   gate and per-file processing
//! * [`package`]: package key to Fusion directory, recursive file listing
//! * [`confirm`]: the injectable source of the operator's answer
//! * [`config`]: JSON settings
//!
//! ## Example
//!
//! ```rust
//! use fusion_dsl_core::{config, rewrite::rewrite, transpiler::TranspilerRegistry};
//!
//! let settings: config::DslSettings = config::from_str(
//!     r#"{ "dsl": { "markdown": { "type": "template", "template": "Markdown.parse('{code}')" } } }"#,
//! )
//! .unwrap();
//! let registry = TranspilerRegistry::from_settings(&settings).unwrap();
//!
//! let result = rewrite("<div>{markdown`# Hi`}</div>", "markdown", &registry).unwrap();
//! assert_eq!(result.content, "<div>{Markdown.parse('# Hi')}</div>");
//! assert!(result.changed());
//! ```

pub mod config;
pub mod confirm;
pub mod controller;
pub mod diff;
pub mod error;
pub mod locator;
pub mod package;
pub mod rewrite;
pub mod transpiler;

// Re-exports
pub use error::*;

#[cfg(test)]
mod tests {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    #[ctor::ctor]
    fn init_tests() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}
