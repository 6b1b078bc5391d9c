//! Tagged classification rules for picking elements by naming convention.
//!
//! Frame exports tag elements with ids and `ffdec:characterName` attributes
//! following loose naming conventions ("a_Hat", "hair_strand2", ...). The
//! resolver stays pattern-agnostic; everything convention-based lives here as
//! data-driven rules that callers supply (or pick from the built-in sets),
//! matched case-insensitively against both the id and the character name.

use serde::{Deserialize, Serialize};

use crate::dom::{Element, SpriteDocument, XmlNode};

/// Attribute carrying the export tool's character name for an element.
pub const CHARACTER_NAME_ATTR: &str = "ffdec:characterName";

/// One classification rule. An element matches when its id or character name
/// (lowercased) contains any `includes` entry or equals any `exact` entry,
/// and contains none of the `excludes` entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassRule {
    /// Label for reporting ("headgear", "accessory", ...).
    pub tag: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub exact: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl ClassRule {
    fn matches_value(&self, value: &str) -> bool {
        let hit = self.includes.iter().any(|s| value.contains(s.as_str()))
            || self.exact.iter().any(|s| value == s.as_str());
        hit && !self.excludes.iter().any(|s| value.contains(s.as_str()))
    }

    /// Whether this rule matches an element's id or character name.
    pub fn matches(&self, element: &Element) -> bool {
        [element.id(), element.attr(CHARACTER_NAME_ATTR)]
            .into_iter()
            .flatten()
            .any(|value| self.matches_value(&value.to_ascii_lowercase()))
    }
}

/// Built-in rule set for hats and other headgear. Capes and cloaks share
/// substrings with "cap" and are explicitly excluded.
pub fn headgear() -> Vec<ClassRule> {
    vec![ClassRule {
        tag: "headgear".to_string(),
        includes: vec!["hat".into(), "cap".into(), "helmet".into(), "headgear".into()],
        exact: vec!["a_hat".into(), "a_headgear".into()],
        excludes: vec!["cape".into(), "cloak".into()],
    }]
}

/// Built-in rule set for jewelry, capes and other accessories.
pub fn accessories() -> Vec<ClassRule> {
    vec![ClassRule {
        tag: "accessory".to_string(),
        includes: vec![
            "accessory".into(),
            "jewelry".into(),
            "necklace".into(),
            "earring".into(),
            "bracelet".into(),
            "cape".into(),
            "cloak".into(),
        ],
        exact: vec!["a_cape".into(), "a_cloak".into()],
        excludes: Vec::new(),
    }]
}

fn matches_any(rules: &[ClassRule], element: &Element) -> bool {
    rules.iter().any(|rule| rule.matches(element))
}

/// Detach every element matching the rules from the document. A matched
/// element is removed with its whole subtree and counts once.
pub fn remove_matching(doc: &mut SpriteDocument, rules: &[ClassRule]) -> usize {
    let mut removed = 0;
    remove_in(doc.root_mut(), rules, &mut removed);
    removed
}

fn remove_in(element: &mut Element, rules: &[ClassRule], removed: &mut usize) {
    element.children.retain(|node| match node {
        XmlNode::Element(el) if matches_any(rules, el) => {
            *removed += 1;
            false
        }
        _ => true,
    });
    for child in element.child_elements_mut() {
        remove_in(child, rules, removed);
    }
}

/// Toggle the visibility of every element matching the rules: hidden
/// elements (via `visibility` or `display`) become visible again, visible
/// ones get `visibility="hidden"`. Returns the number of toggled elements.
pub fn toggle_visibility(doc: &mut SpriteDocument, rules: &[ClassRule]) -> usize {
    let mut toggled = 0;
    doc.root_mut().walk_mut(&mut |el| {
        if !matches_any(rules, el) {
            return;
        }
        if el.attr("visibility") == Some("hidden") || el.attr("display") == Some("none") {
            el.remove_attr("visibility");
            el.remove_attr("display");
        } else {
            el.set_attr("visibility", "hidden");
        }
        toggled += 1;
    });
    toggled
}
