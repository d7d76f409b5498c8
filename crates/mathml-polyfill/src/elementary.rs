//! Hook for the elementary math layouts (`<mstack>`, `<mlongdiv>`).
//!
//! These are rewritten by an external stylesheet transform that this crate does not
//! implement. A [`StylesheetLoader`] produces the transform on first use; [`LazyStylesheet`]
//! makes sure that happens at most once, and only for documents that need it.

use std::cell::OnceCell;
use std::fmt;

use log::{debug, warn};
use mathml_dom::{Document, DomError, MATHML_NAMESPACE, NodeId};

use crate::tag::MathTag;

/// A compiled transform that rewrites whole `<math>` elements.
pub trait StylesheetTransform {
    /// Return the detached nodes that replace `math`, or `None` to leave it as it is.
    fn transform_math(&self, doc: &mut Document, math: NodeId) -> Option<Vec<NodeId>>;
}

/// Produces a [`StylesheetTransform`], typically by fetching and compiling a resource.
pub trait StylesheetLoader {
    fn load(&self) -> Result<Box<dyn StylesheetTransform>, LoadError>;
}

impl<F> StylesheetLoader for F
where
    F: Fn() -> Result<Box<dyn StylesheetTransform>, LoadError>,
{
    fn load(&self) -> Result<Box<dyn StylesheetTransform>, LoadError> {
        self()
    }
}

/// The stylesheet could not be loaded.
#[derive(Debug, Clone)]
pub struct LoadError(pub Box<str>);

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load stylesheet: {}", self.0)
    }
}

impl std::error::Error for LoadError {}

/// A stylesheet that is loaded on first use and then kept.
///
/// A failed load is remembered as well; it is not retried.
pub struct LazyStylesheet {
    loader: Box<dyn StylesheetLoader>,
    transform: OnceCell<Option<Box<dyn StylesheetTransform>>>,
}

impl LazyStylesheet {
    pub fn new(loader: impl StylesheetLoader + 'static) -> Self {
        LazyStylesheet {
            loader: Box::new(loader),
            transform: OnceCell::new(),
        }
    }

    /// Whether a load has been attempted.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.transform.get().is_some()
    }

    pub fn get(&self) -> Option<&dyn StylesheetTransform> {
        self.transform
            .get_or_init(|| match self.loader.load() {
                Ok(transform) => {
                    debug!("elementary math stylesheet loaded");
                    Some(transform)
                }
                Err(err) => {
                    warn!("{err}; leaving elementary math untouched");
                    None
                }
            })
            .as_deref()
    }
}

impl fmt::Debug for LazyStylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyStylesheet")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ElementaryMathStats {
    pub replaced: usize,
    pub declined: usize,
}

/// Run the stylesheet over every `<math>` element, if the document contains any `<mstack>`
/// or `<mlongdiv>`. Without those the stylesheet is not even loaded.
pub fn transform_elementary_math(
    doc: &mut Document,
    stylesheet: &LazyStylesheet,
) -> Result<ElementaryMathStats, DomError> {
    let mut stats = ElementaryMathStats::default();
    let root = doc.root();
    if !doc.contains_element_ns(root, MATHML_NAMESPACE, MathTag::Mstack.as_str())
        && !doc.contains_element_ns(root, MATHML_NAMESPACE, MathTag::Mlongdiv.as_str())
    {
        return Ok(stats);
    }
    let Some(transform) = stylesheet.get() else {
        return Ok(stats);
    };

    let mut index = 0;
    loop {
        // Replacements shift the positions of later `<math>` elements, so look again every time.
        let maths = doc.elements_by_tag_name_ns(root, MATHML_NAMESPACE, MathTag::Math.as_str());
        let Some(&math) = maths.get(index) else {
            break;
        };
        let Some(parent) = doc.parent(math) else {
            index += 1;
            continue;
        };
        match transform.transform_math(doc, math) {
            Some(fragment) => {
                doc.replace_child_with_fragment(parent, &fragment, math)?;
                // Skip the `<math>` elements the replacement brought in, if any.
                index += fragment
                    .iter()
                    .map(|&node| count_math_elements(doc, node))
                    .sum::<usize>();
                stats.replaced += 1;
            }
            None => {
                debug!("stylesheet declined math element {math:?}");
                index += 1;
                stats.declined += 1;
            }
        }
    }
    Ok(stats)
}

/// Number of `<math>` elements in the subtree rooted at `node`, including `node` itself.
fn count_math_elements(doc: &Document, node: NodeId) -> usize {
    let local = MathTag::Math.as_str();
    usize::from(doc.is_mathml(node, local))
        + doc
            .descendants(node)
            .filter(|&descendant| doc.is_mathml(descendant, local))
            .count()
}
