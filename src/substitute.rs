//! Geometry substitution: swap a container's `<path>` children for the
//! paths of a replacement document.
//!
//! The correctness guarantee here is that only geometry changes: the
//! container's own attributes (`transform`, `id`, `visibility`, ...) are
//! never touched, so the replaced part keeps its placement and identity.

use thiserror::Error;

use crate::dom::{Element, SpriteDocument, XmlNode};

/// Error type for substitution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstituteError {
    /// The replacement document contains no `<path>` elements. Checked once
    /// up front, before any target file is touched.
    #[error("no paths found in replacement document")]
    EmptyReplacement,
}

/// Collect the `<path>` elements of a replacement document, in document
/// order, as deep clones ready for insertion.
pub fn replacement_paths(replacement: &SpriteDocument) -> Result<Vec<Element>, SubstituteError> {
    let mut paths = Vec::new();
    replacement.root().walk(&mut |el| {
        if el.name == "path" {
            paths.push(el.clone());
        }
    });
    if paths.is_empty() {
        return Err(SubstituteError::EmptyReplacement);
    }
    Ok(paths)
}

/// Replace every `<path>` child of `container` with clones of `paths`, in
/// source order. Non-path children (nested `<use>`, text, comments) and the
/// container's attributes are left untouched.
pub fn substitute(container: &mut Element, paths: &[Element]) {
    container.children.retain(|node| !matches!(node, XmlNode::Element(el) if el.name == "path"));
    for path in paths {
        container.children.push(XmlNode::Element(path.clone()));
    }
}
