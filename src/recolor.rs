//! Color extraction and global recoloring
//!
//! Extraction walks one sprite's subtree (plus any shapes it references
//! through `<use>`) and reports the distinct color literals it paints with.
//! Recoloring is deliberately global: the same color appearing on unrelated
//! sprites is treated as one design token, so a single recolor call rewrites
//! every occurrence in the document, shapes and standalone elements included.

use crate::color;
use crate::dom::{Element, SpriteDocument};
use crate::resolver::ResolveError;

/// Canonical values excluded from extraction as default noise: non-color
/// keywords plus plain black, which every exported frame is full of.
fn is_extraction_noise(canonical: &str) -> bool {
    matches!(
        canonical,
        "" | "none" | "transparent" | "inherit" | "currentcolor" | "initial" | "unset" | "#000000"
    )
}

/// Distinct color literals used by a sprite, in first-encounter order.
///
/// For each element of the sprite's subtree the `fill` attribute is read
/// before the `stroke` attribute, then `fill:`/`stroke:` declarations inside
/// `style` in their written order. Indirected shapes reached via `<use>` are
/// walked after the sprite's own subtree. Duplicates collapse by canonical
/// form; the first-seen spelling is kept.
pub fn extract_colors(doc: &SpriteDocument, sprite_id: &str) -> Result<Vec<String>, ResolveError> {
    let sprite = doc
        .find_by_id(sprite_id)
        .ok_or_else(|| ResolveError::SpriteNotFound(sprite_id.to_string()))?;

    let mut seen = Vec::new();
    let mut literals = Vec::new();
    let mut record = |literal: &str| {
        let canonical = color::normalize(literal);
        if is_extraction_noise(&canonical) || seen.contains(&canonical) {
            return;
        }
        seen.push(canonical);
        literals.push(literal.trim().to_string());
    };

    let mut shape_ids = Vec::new();
    sprite.walk(&mut |el| {
        collect_element_colors(el, &mut record);
        if el.name == "use" {
            if let Some(shape_id) = el.href().and_then(|href| href.strip_prefix('#')) {
                shape_ids.push(shape_id.to_string());
            }
        }
    });

    for shape_id in shape_ids {
        if let Some(shape) = doc.find_by_id(&shape_id) {
            shape.walk(&mut |el| collect_element_colors(el, &mut record));
        }
    }

    Ok(literals)
}

fn collect_element_colors(element: &Element, record: &mut impl FnMut(&str)) {
    if let Some(fill) = element.attr("fill") {
        record(fill);
    }
    if let Some(stroke) = element.attr("stroke") {
        record(stroke);
    }
    if let Some(style) = element.attr("style") {
        for (_, value) in paint_declarations(style) {
            record(&value);
        }
    }
}

/// Replace one color with another across the whole document.
///
/// Both literals are normalized; a `fill`/`stroke` attribute or style
/// declaration matches when its normalized value equals the normalized old
/// color, and is rewritten to the canonical spelling of the new color.
/// Returns the number of attribute/declaration mutations; zero matches is
/// not an error.
pub fn recolor(doc: &mut SpriteDocument, old_literal: &str, new_literal: &str) -> usize {
    let old = color::normalize(old_literal);
    let new = color::normalize(new_literal);
    let mut mutations = 0;

    doc.root_mut().walk_mut(&mut |el| {
        for attr in ["fill", "stroke"] {
            if let Some(value) = el.attr(attr) {
                if color::normalize(value) == old {
                    el.set_attr(attr, new.clone());
                    mutations += 1;
                }
            }
        }
        if let Some(style) = el.attr("style") {
            let (rewritten, count) = rewrite_style(style, &old, &new);
            if count > 0 {
                el.set_attr("style", rewritten);
                mutations += count;
            }
        }
    });

    mutations
}

/// The `fill`/`stroke` declarations of a style attribute, in written order.
fn paint_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter_map(|(name, value)| {
            let name = name.trim();
            if name == "fill" || name == "stroke" {
                Some((name.to_string(), value.trim().to_string()))
            } else {
                None
            }
        })
        .collect()
}

/// Rewrite matching `fill:`/`stroke:` declarations, leaving every other
/// declaration byte-for-byte intact.
fn rewrite_style(style: &str, old: &str, new: &str) -> (String, usize) {
    let mut count = 0;
    let rewritten: Vec<String> = style
        .split(';')
        .map(|decl| {
            if let Some((name, value)) = decl.split_once(':') {
                let prop = name.trim();
                if (prop == "fill" || prop == "stroke") && color::normalize(value) == old {
                    count += 1;
                    let leading = &value[..value.len() - value.trim_start().len()];
                    return format!("{}:{}{}", name, leading, new);
                }
            }
            decl.to_string()
        })
        .collect();
    (rewritten.join(";"), count)
}
