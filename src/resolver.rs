//! Sprite resolution: from a sprite id (or all sprites) to the mutable
//! container element that holds the geometry.
//!
//! A sprite is one of two kinds, decided at resolution time:
//! - **direct**: the sprite element itself has `<path>` children, so it is
//!   its own container;
//! - **referenced**: the sprite holds a `<use>` child whose `href` /
//!   `xlink:href` points at a shape element elsewhere in the document, and
//!   that shape is the container. Mutating a shared shape affects every
//!   sprite that references it.
//!
//! A sprite with neither direct paths nor a resolvable reference yields no
//! container; batch callers treat that as a skip, not an error.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::dom::{Element, SpriteDocument};

/// Error type for sprite resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// An explicitly requested sprite id is absent from the document.
    #[error("sprite '{0}' not found")]
    SpriteNotFound(String),
}

/// How a sprite's container was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// The sprite element holds its own `<path>` children.
    Direct,
    /// The geometry lives in a shape element referenced through `<use>`.
    Referenced,
}

/// A resolved sprite target. `container_id` addresses the element whose
/// `<path>` children are to be replaced: the sprite itself for direct
/// sprites, the referenced shape for indirected ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub sprite_id: String,
    pub container_id: String,
    pub kind: TargetKind,
}

fn sprite_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^sprite[0-9]+$").expect("valid regex"))
}

/// Whether an id names a sprite placeholder (`sprite<number>`).
pub fn is_sprite_id(id: &str) -> bool {
    sprite_id_pattern().is_match(id)
}

/// Every sprite element id in the document, in document order.
pub fn sprite_ids(doc: &SpriteDocument) -> Vec<String> {
    let mut ids = Vec::new();
    doc.root().walk(&mut |el| {
        if let Some(id) = el.id() {
            if is_sprite_id(id) {
                ids.push(id.to_string());
            }
        }
    });
    ids
}

/// Resolve the container targets for one sprite or for every sprite.
///
/// With `sprite_id` given, the result holds at most one target and a missing
/// id is a [`ResolveError::SpriteNotFound`]. With `sprite_id` omitted, every
/// classifiable `sprite<number>` element contributes one target, in document
/// order; malformed sprites are silently excluded. Single-target callers use
/// only the first element of the sequence, batch callers use all of it.
pub fn resolve_targets(
    doc: &SpriteDocument,
    sprite_id: Option<&str>,
) -> Result<Vec<ResolvedTarget>, ResolveError> {
    match sprite_id {
        Some(id) => {
            let sprite = doc
                .find_by_id(id)
                .ok_or_else(|| ResolveError::SpriteNotFound(id.to_string()))?;
            Ok(classify(doc, id, sprite).into_iter().collect())
        }
        None => Ok(sprite_ids(doc)
            .iter()
            .filter_map(|id| {
                doc.find_by_id(id).and_then(|sprite| classify(doc, id, sprite))
            })
            .collect()),
    }
}

/// Classify one sprite element, returning its container target if it has one.
fn classify(doc: &SpriteDocument, sprite_id: &str, sprite: &Element) -> Option<ResolvedTarget> {
    if sprite.child_elements().any(|child| child.name == "path") {
        return Some(ResolvedTarget {
            sprite_id: sprite_id.to_string(),
            container_id: sprite_id.to_string(),
            kind: TargetKind::Direct,
        });
    }

    // No direct paths: follow the first <use> child's reference
    let use_el = sprite.child_elements().find(|child| child.name == "use")?;
    let shape_id = use_el.href()?.strip_prefix('#')?;
    doc.find_by_id(shape_id)?;

    Some(ResolvedTarget {
        sprite_id: sprite_id.to_string(),
        container_id: shape_id.to_string(),
        kind: TargetKind::Referenced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
  <defs>
    <g id="shape3"><path d="M0 0 L1 1"/></g>
  </defs>
  <g id="sprite1"><path d="M2 2" fill="#ff0000"/></g>
  <g id="sprite2"><use xlink:href="#shape3"/></g>
  <g id="sprite3"><use/></g>
  <g id="sprite4"><use xlink:href="#missing"/></g>
  <g id="decoration"><path d="M9 9"/></g>
</svg>"##;

    fn doc() -> SpriteDocument {
        SpriteDocument::parse(DOC).unwrap()
    }

    #[test]
    fn test_is_sprite_id() {
        assert!(is_sprite_id("sprite1"));
        assert!(is_sprite_id("sprite42"));
        assert!(!is_sprite_id("sprite"));
        assert!(!is_sprite_id("sprite1b"));
        assert!(!is_sprite_id("shape3"));
    }

    #[test]
    fn test_direct_sprite_is_its_own_container() {
        let targets = resolve_targets(&doc(), Some("sprite1")).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].container_id, "sprite1");
        assert_eq!(targets[0].kind, TargetKind::Direct);
    }

    #[test]
    fn test_referenced_sprite_resolves_to_shape() {
        let targets = resolve_targets(&doc(), Some("sprite2")).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].sprite_id, "sprite2");
        assert_eq!(targets[0].container_id, "shape3");
        assert_eq!(targets[0].kind, TargetKind::Referenced);
    }

    #[test]
    fn test_missing_sprite_id_is_an_error() {
        let err = resolve_targets(&doc(), Some("sprite99")).unwrap_err();
        assert_eq!(err, ResolveError::SpriteNotFound("sprite99".to_string()));
    }

    #[test]
    fn test_unresolvable_use_yields_no_target() {
        // href missing entirely
        assert!(resolve_targets(&doc(), Some("sprite3")).unwrap().is_empty());
        // href points at an id that does not exist
        assert!(resolve_targets(&doc(), Some("sprite4")).unwrap().is_empty());
    }

    #[test]
    fn test_all_sprites_in_document_order() {
        let targets = resolve_targets(&doc(), None).unwrap();
        let ids: Vec<&str> = targets.iter().map(|t| t.sprite_id.as_str()).collect();
        // sprite3 and sprite4 are unclassifiable; "decoration" is not a sprite
        assert_eq!(ids, vec!["sprite1", "sprite2"]);
        assert_eq!(targets[1].container_id, "shape3");
    }
}
