use std::fmt;
use std::ops::Range;

use crate::node::NodeId;

/// Represents an error that occurred while parsing an XML document.
#[derive(Debug, Clone)]
pub struct ParseError(pub Range<usize>, pub(crate) ParseErrKind);

#[derive(Debug, Clone)]
pub(crate) enum ParseErrKind {
    /// Malformed XML as reported by the tokenizer.
    Syntax(Box<str>),
    UnclosedElement(Box<str>),
    UnknownPrefix(Box<str>),
    InvalidUtf8,
}

impl ParseErrKind {
    pub fn string(&self) -> String {
        match self {
            ParseErrKind::Syntax(msg) => "Malformed XML: ".to_string() + msg + ".",
            ParseErrKind::UnclosedElement(name) => {
                "Element \"".to_string() + name + "\" is never closed."
            }
            ParseErrKind::UnknownPrefix(prefix) => {
                "Namespace prefix \"".to_string() + prefix + "\" is not declared."
            }
            ParseErrKind::InvalidUtf8 => "Name or content is not valid UTF-8.".to_string(),
        }
    }
}

impl ParseError {
    pub fn error_message(&self) -> String {
        self.1.string()
    }
}

#[cfg(feature = "ariadne")]
impl ParseError {
    /// Convert this error into an [`ariadne::Report`] for pretty-printing.
    pub fn to_report<'name>(
        &self,
        source_name: &'name str,
        with_color: bool,
    ) -> ariadne::Report<'static, (&'name str, Range<usize>)> {
        use ariadne::{Label, Report, ReportKind};

        let label_msg = match &self.1 {
            ParseErrKind::Syntax(_) => "malformed here".to_string(),
            ParseErrKind::UnclosedElement(name) => format!("\"{name}\" opened here"),
            ParseErrKind::UnknownPrefix(_) => "undeclared prefix".to_string(),
            ParseErrKind::InvalidUtf8 => "invalid UTF-8".to_string(),
        };

        let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
        if !with_color {
            config = config.with_color(false);
        }
        Report::build(ReportKind::Error, (source_name, self.0.start..self.0.start))
            .with_config(config)
            .with_message(self.1.string())
            .with_label(Label::new((source_name, self.0.clone())).with_message(label_msg))
            .finish()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.start, self.1.string())
    }
}

impl std::error::Error for ParseError {}

/// A structural operation was asked to do something the tree cannot represent.
///
/// These only arise from misuse of the mutation API, never from document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomError {
    /// The given node is not a child of the given parent.
    NotAChild { parent: NodeId, child: NodeId },
    /// The node cannot be inserted there: the parent cannot hold children, the child is the
    /// document node, or the child is an ancestor of the parent.
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// An attribute operation was applied to a node that is not an element.
    NotAnElement(NodeId),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::NotAChild { parent, child } => {
                write!(f, "node {child:?} is not a child of {parent:?}")
            }
            DomError::HierarchyRequest { parent, child } => {
                write!(f, "node {child:?} cannot be inserted into {parent:?}")
            }
            DomError::NotAnElement(node) => write!(f, "node {node:?} is not an element"),
        }
    }
}

impl std::error::Error for DomError {}
