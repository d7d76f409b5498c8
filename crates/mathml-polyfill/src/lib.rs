//! Rewrite deprecated MathML shorthand into MathML Core.
//!
//! MathML Core dropped a few convenience elements that older documents still use. This crate
//! rewrites them in place into equivalent markup that Core renderers understand:
//!
//! - `<mfenced>` becomes an `<mrow>` with explicit fence and separator `<mo>` elements.
//! - `<mlabeledtr>` becomes a plain `<mtr>` with the label cell duplicated and one copy
//!   hidden; every other row of the same table gets an empty `<mtd>` at both ends, so the
//!   columns stay aligned.
//! - `<mstack>` and `<mlongdiv>` are handed to an external stylesheet transform, if one is
//!   configured (see [`elementary`]).
//!
//! # Usage
//!
//! ```rust
//! use mathml_polyfill::{Polyfill, PolyfillConfig};
//!
//! let polyfill = Polyfill::new(PolyfillConfig::default());
//! let output = polyfill
//!     .normalize_str(r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mfenced><mi>x</mi></mfenced></math>"#)
//!     .unwrap();
//! assert_eq!(
//!     output,
//!     r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mrow><mo fence="true">(</mo><mi>x</mi><mo fence="true">)</mo></mrow></math>"#
//! );
//! ```
//!
//! # Features
//!
//! - `serde`: With this feature, `PolyfillConfig` implements serde's `Deserialize`.
//! - `ariadne`: Enables `ParseError::to_report` for pretty error reports.
//!
pub mod elementary;
mod error;
mod fenced;
mod labeled_row;
mod sweep;
mod tag;
mod text;

use bitflags::bitflags;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use mathml_dom::{Document, DomError, MATHML_NAMESPACE, NodeId, ParseError, QualName};

pub use self::elementary::{LazyStylesheet, LoadError, StylesheetLoader, StylesheetTransform};
pub use self::error::PolyfillError;
pub use self::fenced::expand_fenced;
pub use self::labeled_row::{HIDDEN_LABEL_STYLE, LabelSide, transform_labeled_row, transform_table};
pub use self::sweep::{LabeledRowStats, expand_fenced_elements, transform_labeled_rows};
pub use self::tag::MathTag;
pub use self::text::{collapse_whitespace, parse_separator_list};

bitflags! {
    /// The rewriting passes that a [`Polyfill`] runs.
    ///
    /// With the `serde` feature, this is written as a `|`-separated list of flag names, like
    /// `"FENCED | LABELED_ROWS"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Passes: u8 {
        /// Expand `<mfenced>`.
        const FENCED = 1;
        /// Replace `<mlabeledtr>` and pad the surrounding tables.
        const LABELED_ROWS = 1 << 1;
        /// Run the stylesheet over documents with `<mstack>` or `<mlongdiv>`.
        const ELEMENTARY_MATH = 1 << 2;
    }
}

impl Default for Passes {
    fn default() -> Self {
        Passes::all()
    }
}

/// Configuration object for [`Polyfill`].
///
/// # Example usage
///
/// ```rust
/// use mathml_polyfill::{Passes, PolyfillConfig};
///
/// // All passes
/// let config = PolyfillConfig::default();
///
/// // Only `<mfenced>`
/// let config = PolyfillConfig {
///     passes: Passes::FENCED,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct PolyfillConfig {
    /// Which passes to run. See [`Passes`].
    pub passes: Passes,
}

/// What a single [`Polyfill::run`] changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// `<mfenced>` elements expanded.
    pub fenced: usize,
    /// `<mlabeledtr>` elements replaced.
    pub labeled_rows: usize,
    /// Tables whose rows were normalized.
    pub tables: usize,
    /// `<math>` elements replaced by the stylesheet.
    pub math_replaced: usize,
    /// `<math>` elements the stylesheet left alone.
    pub math_declined: usize,
}

impl SweepReport {
    /// Whether the document was modified.
    #[inline]
    pub fn changed(&self) -> bool {
        self.fenced + self.labeled_rows + self.tables + self.math_replaced > 0
    }
}

/// Runs the rewriting passes over documents.
///
/// The elementary math stylesheet, if any, is loaded on the first document that needs it and
/// then reused for all later documents.
#[derive(Debug, Default)]
pub struct Polyfill {
    passes: Passes,
    stylesheet: Option<LazyStylesheet>,
}

impl Polyfill {
    pub fn new(config: PolyfillConfig) -> Self {
        Self {
            passes: config.passes,
            stylesheet: None,
        }
    }

    /// Use `loader` to obtain the transform for `<mstack>` and `<mlongdiv>`.
    ///
    /// Without a stylesheet, the elementary math pass does nothing.
    pub fn with_stylesheet(mut self, loader: impl StylesheetLoader + 'static) -> Self {
        self.stylesheet = Some(LazyStylesheet::new(loader));
        self
    }

    #[inline]
    pub fn passes(&self) -> Passes {
        self.passes
    }

    /// Rewrite `doc` in place.
    pub fn run(&self, doc: &mut Document) -> Result<SweepReport, DomError> {
        let mut report = SweepReport::default();
        if self.passes.contains(Passes::FENCED) {
            report.fenced = expand_fenced_elements(doc)?;
        }
        if self.passes.contains(Passes::LABELED_ROWS) {
            let stats = transform_labeled_rows(doc)?;
            report.labeled_rows = stats.rows;
            report.tables = stats.tables;
        }
        if self.passes.contains(Passes::ELEMENTARY_MATH)
            && let Some(stylesheet) = &self.stylesheet
        {
            let stats = elementary::transform_elementary_math(doc, stylesheet)?;
            report.math_replaced = stats.replaced;
            report.math_declined = stats.declined;
        }
        debug!("{report:?}");
        Ok(report)
    }

    /// Parse `input`, rewrite it and serialize the result.
    pub fn normalize_str(&self, input: &str) -> Result<String, PolyfillError> {
        let mut doc = Document::parse(input)?;
        self.run(&mut doc)?;
        Ok(doc.to_xml_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns="http://www.w3.org/1998/Math/MathML""#;

    #[test]
    fn passes_can_be_disabled() {
        let input = format!(
            "<math {NS}><mfenced><mi>x</mi></mfenced><mtable><mlabeledtr><mtd/></mlabeledtr></mtable></math>"
        );
        let polyfill = Polyfill::new(PolyfillConfig {
            passes: Passes::LABELED_ROWS,
        });
        let mut doc = Document::parse(&input).unwrap();
        let report = polyfill.run(&mut doc).unwrap();
        assert_eq!(
            report,
            SweepReport {
                labeled_rows: 1,
                tables: 1,
                ..Default::default()
            }
        );
        assert!(doc.contains_element_ns(doc.root(), MATHML_NAMESPACE, "mfenced"));

        let polyfill = Polyfill::new(PolyfillConfig {
            passes: Passes::empty(),
        });
        assert_eq!(polyfill.normalize_str(&input).unwrap(), input);
    }

    #[test]
    fn unchanged_report() {
        let polyfill = Polyfill::default();
        let mut doc = Document::parse(&format!("<math {NS}><mi>x</mi></math>")).unwrap();
        let report = polyfill.run(&mut doc).unwrap();
        assert!(!report.changed());
    }

    #[test]
    fn parse_error_is_reported() {
        let polyfill = Polyfill::default();
        let err = polyfill.normalize_str("<math><mi>x</math>").unwrap_err();
        assert!(matches!(err, PolyfillError::Parse(_)));
    }
}
