use std::fmt;

use mathml_dom::{DomError, ParseError};

/// Error returned by [`Polyfill::normalize_str`](crate::Polyfill::normalize_str).
#[derive(Debug, Clone)]
pub enum PolyfillError {
    /// The input is not well-formed XML.
    Parse(ParseError),
    /// A tree operation failed. This indicates a bug in a rewriter or a stylesheet.
    Dom(DomError),
}

impl fmt::Display for PolyfillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolyfillError::Parse(err) => write!(f, "Parse error at {err}"),
            PolyfillError::Dom(err) => write!(f, "Tree error: {err}"),
        }
    }
}

impl std::error::Error for PolyfillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PolyfillError::Parse(err) => Some(err),
            PolyfillError::Dom(err) => Some(err),
        }
    }
}

impl From<ParseError> for PolyfillError {
    fn from(err: ParseError) -> Self {
        PolyfillError::Parse(err)
    }
}

impl From<DomError> for PolyfillError {
    fn from(err: DomError) -> Self {
        PolyfillError::Dom(err)
    }
}
