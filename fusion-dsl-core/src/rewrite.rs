//! # Rewrite Engine
//!
//! Replaces the call-sites of one DSL identifier with their transpiled Fusion
//! code and leaves every other byte of the buffer where it was.
//!
//! ```text
//! <div>{markdown`# Hi`}</div>     target: markdown
//!       ^^^^^^^^^^^^^^
//! <div>{Markdown.parse('# Hi')}</div>
//! ```
//!
//! Call-sites of other identifiers are copied verbatim, delimiters included,
//! and their bodies never reach a transpiler. The new buffer is assembled in
//! memory, so a failing transpiler aborts the rewrite without any partial
//! result escaping.

use std::ops::Range;

use tracing::{debug, instrument};

use crate::{
    Error, InternalResult,
    locator::ExpressionLocator,
    transpiler::TranspilerRegistry,
};

/// One substituted call-site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Byte range of the call-site in the original buffer.
    pub span: Range<usize>,
    /// The call-site text as it was, identifier and backticks included.
    pub original: String,
    /// The transpiler output that took its place.
    pub transpiled: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub replacements: Vec<Replacement>,
}

impl Rewrite {
    /// True iff at least one call-site was substituted.
    pub fn changed(&self) -> bool {
        !self.replacements.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct RewriteEngine<'a> {
    locator: ExpressionLocator,
    registry: &'a TranspilerRegistry,
}

impl<'a> RewriteEngine<'a> {
    pub fn new(registry: &'a TranspilerRegistry) -> Self {
        Self {
            locator: ExpressionLocator::new(),
            registry,
        }
    }

    #[instrument(level = "debug", skip(self, buffer), fields(bytes = buffer.len()))]
    pub fn rewrite(&self, buffer: &str, target: &str) -> InternalResult<Rewrite> {
        let transpiler = self.registry.resolve(target)?;

        let mut content = String::with_capacity(buffer.len());
        let mut replacements = Vec::new();
        let mut cursor = 0;

        for site in self.locator.iter(buffer) {
            if site.identifier != target {
                continue;
            }

            let transpiled =
                transpiler
                    .transpile(site.code)
                    .map_err(|reason| Error::TranspileFailure {
                        identifier: target.to_string(),
                        reason,
                    })?;

            content.push_str(&buffer[cursor..site.start]);
            content.push_str(&transpiled);
            cursor = site.end;

            replacements.push(Replacement {
                span: site.span(),
                original: buffer[site.span()].to_string(),
                transpiled,
            });
        }
        content.push_str(&buffer[cursor..]);

        debug!(replaced = replacements.len(), "rewrite finished");
        Ok(Rewrite {
            content,
            replacements,
        })
    }
}

/// Convenience wrapper around [`RewriteEngine::rewrite`].
pub fn rewrite(
    buffer: &str,
    target: &str,
    registry: &TranspilerRegistry,
) -> InternalResult<Rewrite> {
    RewriteEngine::new(registry).rewrite(buffer, target)
}
