//! Replace and apply command implementations

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::engine::{self, FileStatus, PriorModification};
use crate::frames;

use super::{check_format, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the replace command: single file, single or first sprite.
pub fn run_replace(
    file: &Path,
    replacement: &Path,
    sprite: Option<&str>,
    output: Option<&Path>,
) -> ExitCode {
    let document_text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", file.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let replacement_text = match fs::read_to_string(replacement) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", replacement.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let outcome = match engine::resolve_and_substitute(&document_text, &replacement_text, sprite) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}: {}", file.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let target = output.unwrap_or(file);
    if let Err(e) = fs::write(target, &outcome.updated_text) {
        eprintln!("Error: cannot write {}: {}", target.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "Updated {} sprite element{} in {}",
        outcome.targets_touched,
        if outcome.targets_touched == 1 { "" } else { "s" },
        target.display()
    );
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the apply command: every frame of a collection, all matching
/// sprites per frame.
pub fn run_apply(
    dir: &Path,
    replacement: &Path,
    sprite: Option<&str>,
    modifications: Option<&Path>,
    format: &str,
) -> ExitCode {
    if let Err(code) = check_format(format) {
        return code;
    }

    let files = match frames::list_frames(dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if files.is_empty() {
        eprintln!("Error: no SVG files found in {}", dir.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let replacement_text = match fs::read_to_string(replacement) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", replacement.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let prior = match modifications.map(load_modifications).transpose() {
        Ok(prior) => prior,
        Err(code) => return code,
    };

    let report =
        match engine::batch_apply(dir, &files, &replacement_text, sprite, prior.as_ref()) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };

    if format == "json" {
        println!(
            "{}",
            serde_json::json!({
                "message": report.summary(),
                "results": report.results,
            })
        );
    } else {
        for outcome in &report.results {
            match &outcome.message {
                Some(message) => println!("{}: {:?} ({})", outcome.file, outcome.status, message),
                None => println!("{}: {:?}", outcome.file, outcome.status),
            }
        }
        println!("{}", report.summary());
    }

    if report.results.iter().any(|o| o.status == FileStatus::Error) {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

fn load_modifications(path: &Path) -> Result<PriorModification, ExitCode> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: cannot read {}: {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })?;
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("Error: invalid modifications file {}: {}", path.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}
