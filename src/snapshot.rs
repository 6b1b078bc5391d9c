//! Modification snapshots: preserve per-path attribute edits across a
//! destructive substitution.
//!
//! A snapshot records the present attributes of a sprite's `<path>` children
//! (and of any referenced shape's paths, tagged by the reference id) before
//! geometry is replaced, and writes them back positionally afterwards: the
//! map captured at index `i` lands on the live path at index `i`. This is a
//! best-effort merge, not a structural diff - replacement sources in this
//! asset pipeline keep a stable path order per part, so positional pairing
//! is good enough. Captured paths without a live counterpart are dropped;
//! live paths without a captured map are left as inserted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::{Element, SpriteDocument};
use crate::resolver::ResolveError;

/// Path attributes worth preserving. Only keys present on the captured path
/// are recorded.
pub const PATH_ATTRIBUTES: [&str; 9] = [
    "d",
    "fill",
    "stroke",
    "style",
    "transform",
    "opacity",
    "fill-opacity",
    "stroke-opacity",
    "stroke-width",
];

/// One path's captured attributes, keyed by attribute name.
pub type PathAttrs = BTreeMap<String, String>;

/// Captured attribute maps for a referenced shape's paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    /// Id of the shape the sprite's `<use>` pointed at.
    pub shape_id: String,
    pub paths: Vec<PathAttrs>,
}

/// Attribute deltas for one sprite, captured before a substitution and
/// consumed once immediately after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    /// Per-path attribute maps for the sprite's direct `<path>` children.
    #[serde(default)]
    pub paths: Vec<PathAttrs>,
    /// Attribute maps for shapes reached through the sprite's `<use>`
    /// children.
    #[serde(default)]
    pub shapes: Vec<ShapeSnapshot>,
}

/// Capture a sprite's path attributes. Returns `None` when the sprite has
/// neither direct paths nor a resolvable `<use>` reference - nothing to
/// preserve.
pub fn capture(doc: &SpriteDocument, sprite_id: &str) -> Result<Option<Snapshot>, ResolveError> {
    let sprite = doc
        .find_by_id(sprite_id)
        .ok_or_else(|| ResolveError::SpriteNotFound(sprite_id.to_string()))?;

    let paths = capture_paths(sprite);

    let mut shapes = Vec::new();
    for use_el in sprite.child_elements().filter(|el| el.name == "use") {
        let Some(shape_id) = use_el.href().and_then(|href| href.strip_prefix('#')) else {
            continue;
        };
        if let Some(shape) = doc.find_by_id(shape_id) {
            shapes.push(ShapeSnapshot { shape_id: shape_id.to_string(), paths: capture_paths(shape) });
        }
    }

    if paths.is_empty() && shapes.is_empty() {
        return Ok(None);
    }
    Ok(Some(Snapshot { paths, shapes }))
}

/// Write a snapshot back onto the sprite's current paths, positionally.
///
/// Referenced shapes that no longer exist are skipped; index mismatches are
/// resolved by dropping the excess on either side.
pub fn reapply(
    doc: &mut SpriteDocument,
    sprite_id: &str,
    snapshot: &Snapshot,
) -> Result<(), ResolveError> {
    match doc.find_by_id_mut(sprite_id) {
        Some(sprite) => apply_paths(sprite, &snapshot.paths),
        None => return Err(ResolveError::SpriteNotFound(sprite_id.to_string())),
    }

    for shape_snapshot in &snapshot.shapes {
        if let Some(shape) = doc.find_by_id_mut(&shape_snapshot.shape_id) {
            apply_paths(shape, &shape_snapshot.paths);
        }
    }

    Ok(())
}

fn capture_paths(container: &Element) -> Vec<PathAttrs> {
    container
        .child_elements()
        .filter(|el| el.name == "path")
        .map(|path| {
            PATH_ATTRIBUTES
                .iter()
                .filter_map(|&name| path.attr(name).map(|value| (name.to_string(), value.to_string())))
                .collect()
        })
        .collect()
}

fn apply_paths(container: &mut Element, captured: &[PathAttrs]) {
    let mut live_paths: Vec<&mut Element> =
        container.child_elements_mut().filter(|el| el.name == "path").collect();
    for (path, attrs) in live_paths.iter_mut().zip(captured) {
        for (name, value) in attrs {
            path.set_attr(name, value.clone());
        }
    }
}
