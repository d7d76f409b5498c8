//! Internal library for the `mathml-polyfill` crate: a mutable, namespace-aware XML tree.
//!
//! The tree is an arena ([`Document`]) addressed by [`NodeId`] handles. It supports the
//! operations needed to rewrite MathML in place: namespace-qualified element lookup in
//! document order, attribute access, moving and replacing children, and deep copies.
//!
//! # Example
//!
//! ```rust
//! use mathml_polyfill_dom_internal::{Document, MATHML_NAMESPACE};
//!
//! let mut doc = Document::parse(
//!     r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mi>x</mi></math>"#,
//! ).unwrap();
//! let math = doc.document_element().unwrap();
//! let mi = doc.first_element_child(math).unwrap();
//! let mn = doc.create_mathml_element("mn");
//! let two = doc.create_text("2");
//! doc.append_child(mn, two).unwrap();
//! doc.replace_child(math, mn, mi).unwrap();
//! assert_eq!(
//!     doc.to_xml_string(),
//!     r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mn>2</mn></math>"#
//! );
//! assert!(!doc.contains_element_ns(doc.root(), MATHML_NAMESPACE, "mi"));
//! ```
mod document;
mod entities;
mod error;
pub mod escape;
mod node;
mod parse;
mod serialize;

pub use self::document::{Descendants, Document};
pub use self::error::{DomError, ParseError};
pub use self::node::{Attribute, ElementData, NodeId, NodeKind, QualName, XmlDecl};

/// The MathML namespace.
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// The namespace of `xmlns` and `xmlns:*` declarations.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
