//! Single-document and batch sprite replacement.
//!
//! `resolve_and_substitute` is the text-in/text-out entry point for one
//! document (first-sprite semantics when no id is given). `batch_apply`
//! drives a whole collection: every file is backed up on first write, parsed,
//! resolved (all matching sprites), substituted, optionally patched with
//! prior modifications, and written back - strictly sequentially, with one
//! file's failure recorded as a per-file outcome instead of aborting the
//! batch.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backup::{self, BackupError};
use crate::dom::{ParseError, SpriteDocument};
use crate::recolor;
use crate::resolver::{self, ResolveError};
use crate::snapshot::{self, Snapshot};
use crate::substitute::{self, SubstituteError};

/// Error type for engine operations. Batch processing converts these into
/// per-file outcomes; single-document operations propagate them unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Substitute(#[from] SubstituteError),
    #[error(transparent)]
    Backup(#[from] BackupError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a single-document substitution.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaceOutcome {
    pub updated_text: String,
    pub targets_touched: usize,
}

/// A previously made color edit to re-play after substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecolorPair {
    pub from: String,
    pub to: String,
}

/// Edits captured before an earlier destructive operation, to be reapplied
/// on top of freshly substituted geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorModification {
    /// Global color substitutions, applied in order.
    #[serde(default)]
    pub recolors: Vec<RecolorPair>,
    /// Positional per-path attribute snapshot for the targeted sprite.
    /// Only applied when the batch names a sprite id.
    #[serde(default)]
    pub snapshot: Option<Snapshot>,
}

/// Terminal state of one file in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Updated,
    Skipped,
    Error,
}

/// Outcome of processing one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub file: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Aggregated batch results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub results: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn updated(&self) -> usize {
        self.count(FileStatus::Updated)
    }

    pub fn skipped(&self) -> usize {
        self.count(FileStatus::Skipped)
    }

    pub fn errors(&self) -> usize {
        self.count(FileStatus::Error)
    }

    pub fn summary(&self) -> String {
        format!(
            "Updated {} files, skipped {} files, {} errors",
            self.updated(),
            self.skipped(),
            self.errors()
        )
    }

    fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|outcome| outcome.status == status).count()
    }
}

/// Substitute replacement geometry into one document.
///
/// With a sprite id, that sprite's container is the single target and a
/// missing id is fatal. Without one, the *first* classifiable sprite is used
/// (legacy single-target semantics); a document with no usable sprite comes
/// back unchanged with `targets_touched == 0`.
pub fn resolve_and_substitute(
    document_text: &str,
    replacement_text: &str,
    sprite_id: Option<&str>,
) -> Result<ReplaceOutcome, EngineError> {
    let replacement = SpriteDocument::parse(replacement_text)?;
    let paths = substitute::replacement_paths(&replacement)?;

    let mut doc = SpriteDocument::parse(document_text)?;
    let targets = resolver::resolve_targets(&doc, sprite_id)?;

    let Some(target) = targets.first() else {
        return Ok(ReplaceOutcome { updated_text: document_text.to_string(), targets_touched: 0 });
    };
    let Some(container) = doc.find_by_id_mut(&target.container_id) else {
        return Ok(ReplaceOutcome { updated_text: document_text.to_string(), targets_touched: 0 });
    };

    substitute::substitute(container, &paths);
    Ok(ReplaceOutcome { updated_text: doc.serialize(), targets_touched: 1 })
}

/// Apply a replacement to every file of a collection.
///
/// `files` are paths relative to `collection`. The replacement is validated
/// once before any file is touched; an empty replacement is fatal for the
/// whole call. Per-file failures (parse, I/O) become `error` outcomes and
/// the loop continues. Without a sprite id, *all* classifiable sprites in
/// each file are substituted.
pub fn batch_apply(
    collection: &Path,
    files: &[PathBuf],
    replacement_text: &str,
    sprite_id: Option<&str>,
    prior: Option<&PriorModification>,
) -> Result<BatchReport, EngineError> {
    let replacement = SpriteDocument::parse(replacement_text)?;
    let paths = substitute::replacement_paths(&replacement)?;

    let mut report = BatchReport::default();
    for file in files {
        let (status, message) = match apply_file(collection, file, &paths, sprite_id, prior) {
            Ok(result) => result,
            Err(e) => (FileStatus::Error, Some(e.to_string())),
        };
        report.results.push(FileOutcome {
            file: file.display().to_string(),
            status,
            message,
        });
    }
    Ok(report)
}

fn apply_file(
    collection: &Path,
    file: &Path,
    paths: &[crate::dom::Element],
    sprite_id: Option<&str>,
    prior: Option<&PriorModification>,
) -> Result<(FileStatus, Option<String>), EngineError> {
    backup::ensure_backup(collection, file)?;

    let live_path = collection.join(file);
    let text = fs::read_to_string(&live_path)?;
    let mut doc = SpriteDocument::parse(&text)?;

    let targets = match resolver::resolve_targets(&doc, sprite_id) {
        Ok(targets) => targets,
        Err(ResolveError::SpriteNotFound(id)) => {
            return Ok((FileStatus::Skipped, Some(format!("sprite '{}' not found", id))));
        }
    };
    if targets.is_empty() {
        return Ok((FileStatus::Skipped, Some("no suitable sprite found".to_string())));
    }

    for target in &targets {
        if let Some(container) = doc.find_by_id_mut(&target.container_id) {
            substitute::substitute(container, paths);
        }
    }

    if let Some(prior) = prior {
        for pair in &prior.recolors {
            recolor::recolor(&mut doc, &pair.from, &pair.to);
        }
        if let (Some(snap), Some(id)) = (prior.snapshot.as_ref(), sprite_id) {
            snapshot::reapply(&mut doc, id, snap)?;
        }
    }

    fs::write(&live_path, doc.serialize())?;
    Ok((FileStatus::Updated, None))
}
