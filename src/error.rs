//! Error types for parsing SVG source

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::document::lexer::{format_token, Token};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("no root element found")]
    MissingRoot { span: Span },

    #[error("root element is <{name}>, expected <svg>")]
    NotSvg { span: Span, name: String },

    #[error("duplicate attribute '{name}' on root element")]
    DuplicateAttribute { span: Span, name: String },
}

impl ParseError {
    pub fn syntax(span: Span, message: impl Into<String>, expected: &[&str]) -> Self {
        Self::Syntax {
            span,
            message: message.into(),
            expected: expected.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Build an error for a token that does not fit the start tag grammar
    ///
    /// `found` is `None` at end of input, in which case the error points at `eof`.
    pub fn unexpected(
        source: &str,
        found: Option<(Result<Token, ()>, Span)>,
        expected: &[&str],
        eof: usize,
    ) -> Self {
        match found {
            Some((Ok(tok), span)) => {
                Self::syntax(span, format!("Unexpected {}", format_token(&tok)), expected)
            }
            Some((Err(()), span)) => {
                let text = source.get(span.clone()).unwrap_or_default();
                Self::syntax(span, format!("Unexpected input '{}'", text), expected)
            }
            None => Self::syntax(eof..eof, "Unexpected end of input", expected),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::Syntax { span, .. }
            | Self::MissingRoot { span }
            | Self::NotSvg { span, .. }
            | Self::DuplicateAttribute { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let label = match self {
            ParseError::Syntax {
                message, expected, ..
            } => {
                if expected.is_empty() {
                    message.clone()
                } else {
                    format!("{}\nExpected: {}", message, expected.join(", "))
                }
            }
            other => other.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
