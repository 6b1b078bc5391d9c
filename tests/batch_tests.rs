//! Batch pipeline tests over real directories: backups, per-file
//! outcomes, prior-modification reapply and restore.

use std::fs;
use std::path::{Path, PathBuf};

use spritemod::backup::{self, RestoreStatus};
use spritemod::dom::SpriteDocument;
use spritemod::engine::{self, FileStatus, PriorModification, RecolorPair};
use spritemod::snapshot;

const REPLACEMENT: &str = r##"<svg xmlns="http://www.w3.org/2000/svg">
  <path d="M10 10 L20 20" fill="#00ff00"/>
</svg>"##;

fn frame(fill: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg"><g id="sprite1" transform="translate(1,2)"><path d="M0 0" fill="{fill}"/></g></svg>"##
    )
}

fn write_frames(dir: &Path) -> Vec<PathBuf> {
    fs::write(dir.join("1.svg"), frame("#ff0000")).unwrap();
    fs::write(dir.join("2.svg"), frame("#00aabb")).unwrap();
    vec![PathBuf::from("1.svg"), PathBuf::from("2.svg")]
}

#[test]
fn batch_updates_every_file_and_backs_them_up_first() {
    let tmp = tempfile::tempdir().unwrap();
    let files = write_frames(tmp.path());

    let report = engine::batch_apply(tmp.path(), &files, REPLACEMENT, Some("sprite1"), None).unwrap();
    assert_eq!(report.updated(), 2);
    assert_eq!(report.errors(), 0);
    assert_eq!(report.summary(), "Updated 2 files, skipped 0 files, 0 errors");

    // Backups hold the pre-modification content
    let backed_up = fs::read_to_string(tmp.path().join("backups/1.svg")).unwrap();
    assert_eq!(backed_up, frame("#ff0000"));

    let updated = fs::read_to_string(tmp.path().join("1.svg")).unwrap();
    let doc = SpriteDocument::parse(&updated).unwrap();
    let sprite = doc.find_by_id("sprite1").unwrap();
    assert_eq!(sprite.attr("transform"), Some("translate(1,2)"));
    assert_eq!(
        sprite.child_elements().next().unwrap().attr("d"),
        Some("M10 10 L20 20")
    );
}

#[test]
fn backups_are_write_once_across_repeated_batches() {
    let tmp = tempfile::tempdir().unwrap();
    let files = write_frames(tmp.path());

    engine::batch_apply(tmp.path(), &files, REPLACEMENT, Some("sprite1"), None).unwrap();
    engine::batch_apply(tmp.path(), &files, REPLACEMENT, Some("sprite1"), None).unwrap();

    // The second run must not overwrite the original backup
    let backed_up = fs::read_to_string(tmp.path().join("backups/1.svg")).unwrap();
    assert_eq!(backed_up, frame("#ff0000"));
}

#[test]
fn one_malformed_file_does_not_abort_the_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let mut files = write_frames(tmp.path());
    fs::write(tmp.path().join("3.svg"), "<svg><g id=></svg>").unwrap();
    files.push(PathBuf::from("3.svg"));

    let report = engine::batch_apply(tmp.path(), &files, REPLACEMENT, Some("sprite1"), None).unwrap();
    assert_eq!(report.updated(), 2);
    assert_eq!(report.errors(), 1);

    let bad = report
        .results
        .iter()
        .find(|outcome| outcome.file == "3.svg")
        .unwrap();
    assert_eq!(bad.status, FileStatus::Error);
    assert!(bad.message.is_some());
}

#[test]
fn missing_sprite_is_skipped_not_failed() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("1.svg"), frame("#ff0000")).unwrap();
    fs::write(
        tmp.path().join("2.svg"),
        r##"<svg xmlns="http://www.w3.org/2000/svg"><g id="other"><path d="M0 0"/></g></svg>"##,
    )
    .unwrap();
    let files = vec![PathBuf::from("1.svg"), PathBuf::from("2.svg")];

    let report = engine::batch_apply(tmp.path(), &files, REPLACEMENT, Some("sprite1"), None).unwrap();
    assert_eq!(report.updated(), 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.errors(), 0);

    // The skipped file is untouched on disk
    let untouched = fs::read_to_string(tmp.path().join("2.svg")).unwrap();
    assert!(untouched.contains("id=\"other\""));
}

#[test]
fn prior_recolors_and_snapshot_are_reapplied_after_substitution() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("1.svg"), frame("#ff0000")).unwrap();

    let original = SpriteDocument::parse(&frame("#ff0000")).unwrap();
    let snap = snapshot::capture(&original, "sprite1").unwrap().unwrap();

    let prior = PriorModification {
        recolors: vec![RecolorPair {
            from: "#00ff00".to_string(),
            to: "#aabbcc".to_string(),
        }],
        snapshot: Some(snap),
    };

    let report = engine::batch_apply(
        tmp.path(),
        &[PathBuf::from("1.svg")],
        REPLACEMENT,
        Some("sprite1"),
        Some(&prior),
    )
    .unwrap();
    assert_eq!(report.updated(), 1);

    let updated = fs::read_to_string(tmp.path().join("1.svg")).unwrap();
    let doc = SpriteDocument::parse(&updated).unwrap();
    let path = doc
        .find_by_id("sprite1")
        .unwrap()
        .child_elements()
        .next()
        .unwrap()
        .clone();
    // The recolor rewrote the replacement fill, then the snapshot restored
    // the captured geometry and fill on top
    assert_eq!(path.attr("fill"), Some("#ff0000"));
    assert_eq!(path.attr("d"), Some("M0 0"));
}

#[test]
fn restore_brings_back_backed_up_content() {
    let tmp = tempfile::tempdir().unwrap();
    let files = write_frames(tmp.path());

    engine::batch_apply(tmp.path(), &files, REPLACEMENT, Some("sprite1"), None).unwrap();
    assert_ne!(fs::read_to_string(tmp.path().join("1.svg")).unwrap(), frame("#ff0000"));

    let outcomes = backup::restore_all(tmp.path()).unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.status == RestoreStatus::Restored));

    assert_eq!(fs::read_to_string(tmp.path().join("1.svg")).unwrap(), frame("#ff0000"));
    assert_eq!(fs::read_to_string(tmp.path().join("2.svg")).unwrap(), frame("#00aabb"));
}

#[test]
fn restore_without_backups_reports_the_missing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let err = backup::restore_all(tmp.path()).unwrap_err();
    assert!(matches!(err, backup::BackupError::NoBackupsFound(_)));
}
