//! End-to-end tests for the document-level engine API: resolution,
//! substitution, recoloring and snapshots working together on whole
//! documents.

use spritemod::dom::SpriteDocument;
use spritemod::engine::{self, EngineError};
use spritemod::recolor;
use spritemod::resolver::{self, TargetKind};
use spritemod::snapshot;
use spritemod::substitute::{self, SubstituteError};

const FRAME: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
  <defs>
    <g id="shape12"><path d="M0 0 L4 4" fill="#553311"/></g>
  </defs>
  <g id="sprite1" transform="matrix(1,0,0,1,10,20)">
    <path d="M1 1 L2 2" fill="#ff0000" style="stroke:#00ff00"/>
    <path d="M3 3" fill="#000000"/>
  </g>
  <g id="sprite2" transform="translate(7,8)"><use xlink:href="#shape12"/></g>
  <g id="sprite3" transform="translate(7,8)"><use xlink:href="#shape12"/></g>
</svg>"##;

const REPLACEMENT: &str = r##"<svg xmlns="http://www.w3.org/2000/svg">
  <path d="M10 10 L20 20" fill="#00ff00"/>
</svg>"##;

#[test]
fn replace_named_sprite_preserves_transform() {
    let outcome = engine::resolve_and_substitute(FRAME, REPLACEMENT, Some("sprite1")).unwrap();
    assert_eq!(outcome.targets_touched, 1);

    let doc = SpriteDocument::parse(&outcome.updated_text).unwrap();
    let sprite = doc.find_by_id("sprite1").unwrap();
    assert_eq!(sprite.attr("transform"), Some("matrix(1,0,0,1,10,20)"));

    let paths: Vec<_> = sprite.child_elements().filter(|el| el.name == "path").collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].attr("d"), Some("M10 10 L20 20"));
    assert_eq!(paths[0].attr("fill"), Some("#00ff00"));
}

#[test]
fn replacing_shared_shape_affects_every_referencing_sprite() {
    let outcome = engine::resolve_and_substitute(FRAME, REPLACEMENT, Some("sprite2")).unwrap();
    assert_eq!(outcome.targets_touched, 1);

    let doc = SpriteDocument::parse(&outcome.updated_text).unwrap();
    // sprite2 and sprite3 both render shape12; the shape got the new geometry
    let shape = doc.find_by_id("shape12").unwrap();
    assert_eq!(shape.child_elements().next().unwrap().attr("d"), Some("M10 10 L20 20"));
    // Both sprites still point at it and keep their own transforms
    for id in ["sprite2", "sprite3"] {
        let sprite = doc.find_by_id(id).unwrap();
        assert_eq!(sprite.attr("transform"), Some("translate(7,8)"));
        assert!(sprite.child_elements().any(|el| el.name == "use"));
    }
}

#[test]
fn replace_unknown_sprite_fails_before_writing_anything() {
    let err = engine::resolve_and_substitute(FRAME, REPLACEMENT, Some("sprite42")).unwrap_err();
    assert!(matches!(err, EngineError::Resolve(_)));
}

#[test]
fn replacement_without_paths_is_rejected_up_front() {
    let err = engine::resolve_and_substitute(FRAME, "<svg><g/></svg>", None).unwrap_err();
    assert!(matches!(err, EngineError::Substitute(SubstituteError::EmptyReplacement)));
}

#[test]
fn malformed_input_surfaces_a_parse_error() {
    let err = engine::resolve_and_substitute("<svg><g id=></svg>", REPLACEMENT, None).unwrap_err();
    assert!(matches!(err, EngineError::Parse(_)));
}

#[test]
fn resolution_classifies_direct_and_referenced_sprites() {
    let doc = SpriteDocument::parse(FRAME).unwrap();
    let targets = resolver::resolve_targets(&doc, None).unwrap();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0].kind, TargetKind::Direct);
    assert_eq!(targets[0].container_id, "sprite1");
    assert_eq!(targets[1].kind, TargetKind::Referenced);
    assert_eq!(targets[1].container_id, "shape12");
    assert_eq!(targets[2].sprite_id, "sprite3");
}

#[test]
fn extracted_colors_skip_black_and_order_fill_first() {
    let doc = SpriteDocument::parse(FRAME).unwrap();
    let colors = recolor::extract_colors(&doc, "sprite1").unwrap();
    assert_eq!(colors, vec!["#ff0000", "#00ff00"]);
}

#[test]
fn extracted_colors_follow_shape_references() {
    let doc = SpriteDocument::parse(FRAME).unwrap();
    let colors = recolor::extract_colors(&doc, "sprite2").unwrap();
    assert_eq!(colors, vec!["#553311"]);
}

#[test]
fn recolor_round_trip_restores_the_document() {
    let mut doc = SpriteDocument::parse(FRAME).unwrap();
    let original = doc.serialize();

    let forward = recolor::recolor(&mut doc, "#ff0000", "#123456");
    assert_eq!(forward, 1);
    assert_ne!(doc.serialize(), original);

    let back = recolor::recolor(&mut doc, "#123456", "#ff0000");
    assert_eq!(back, forward);
    assert_eq!(doc.serialize(), original);
}

#[test]
fn snapshot_survives_a_substitution() {
    let mut doc = SpriteDocument::parse(FRAME).unwrap();
    let snap = snapshot::capture(&doc, "sprite1").unwrap().unwrap();
    assert_eq!(snap.paths.len(), 2);

    // Substitute new geometry, then reapply the captured attributes
    let replacement = SpriteDocument::parse(REPLACEMENT).unwrap();
    let paths = substitute::replacement_paths(&replacement).unwrap();
    substitute::substitute(doc.find_by_id_mut("sprite1").unwrap(), &paths);
    snapshot::reapply(&mut doc, "sprite1", &snap).unwrap();

    let sprite = doc.find_by_id("sprite1").unwrap();
    let first = sprite.child_elements().next().unwrap();
    // Positional merge: the first captured map (fill, style, d) lands on the
    // single new path
    assert_eq!(first.attr("fill"), Some("#ff0000"));
    assert_eq!(first.attr("style"), Some("stroke:#00ff00"));
    assert_eq!(first.attr("d"), Some("M1 1 L2 2"));
}
