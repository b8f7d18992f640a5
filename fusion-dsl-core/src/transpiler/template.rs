use crate::config::Escape;

use super::{TranspileResult, Transpiler};

pub const CODE_PLACEHOLDER: &str = "{code}";

/// Places the code body into a fixed Fusion template.
///
/// Every `{code}` placeholder in the template is replaced by the body,
/// escaped for the surrounding string literal when `escape` asks for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateTranspiler {
    template: String,
    escape: Escape,
}

impl TemplateTranspiler {
    pub fn new(template: impl Into<String>, escape: Escape) -> Self {
        Self {
            template: template.into(),
            escape,
        }
    }

    fn escape_code(&self, code: &str) -> String {
        let quote = match self.escape {
            Escape::None => return code.to_string(),
            Escape::SingleQuote => '\'',
            Escape::DoubleQuote => '"',
        };

        let mut escaped = String::with_capacity(code.len());
        for c in code.chars() {
            if c == '\\' || c == quote {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }
}

impl Transpiler for TemplateTranspiler {
    fn transpile(&self, code: &str) -> TranspileResult<String> {
        Ok(self
            .template
            .replace(CODE_PLACEHOLDER, &self.escape_code(code)))
    }
}
