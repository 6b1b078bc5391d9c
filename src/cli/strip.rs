//! Strip command implementation: classified element removal / hiding

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::backup;
use crate::classify::{self, ClassRule};
use crate::dom::SpriteDocument;
use crate::frames;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the strip command over a whole collection.
pub fn run_strip(
    dir: &Path,
    rules: Option<&str>,
    rules_file: Option<&Path>,
    toggle: bool,
) -> ExitCode {
    let rules = match load_rules(rules, rules_file) {
        Ok(rules) => rules,
        Err(code) => return code,
    };

    let files = match frames::list_frames(dir) {
        Ok(files) if !files.is_empty() => files,
        Ok(_) => {
            eprintln!("Error: no SVG files found in {}", dir.display());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut touched = 0usize;
    let mut failures = 0usize;
    for file in &files {
        match strip_file(dir, file, &rules, toggle) {
            Ok(count) => touched += count,
            Err(message) => {
                eprintln!("Error: {}: {}", file.display(), message);
                failures += 1;
            }
        }
    }

    let verb = if toggle { "Toggled" } else { "Removed" };
    println!(
        "{} {} element{} across {} files, {} errors",
        verb,
        touched,
        if touched == 1 { "" } else { "s" },
        files.len() - failures,
        failures
    );
    if failures > 0 {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

fn strip_file(
    dir: &Path,
    file: &Path,
    rules: &[ClassRule],
    toggle: bool,
) -> Result<usize, String> {
    backup::ensure_backup(dir, file).map_err(|e| e.to_string())?;

    let live = dir.join(file);
    let text = fs::read_to_string(&live).map_err(|e| e.to_string())?;
    let mut doc = SpriteDocument::parse(&text).map_err(|e| e.to_string())?;

    let count = if toggle {
        classify::toggle_visibility(&mut doc, rules)
    } else {
        classify::remove_matching(&mut doc, rules)
    };

    if count > 0 {
        fs::write(&live, doc.serialize()).map_err(|e| e.to_string())?;
    }
    Ok(count)
}

fn load_rules(
    rules: Option<&str>,
    rules_file: Option<&Path>,
) -> Result<Vec<ClassRule>, ExitCode> {
    if let Some(path) = rules_file {
        let text = fs::read_to_string(path).map_err(|e| {
            eprintln!("Error: cannot read {}: {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        })?;
        return serde_json::from_str(&text).map_err(|e| {
            eprintln!("Error: invalid rules file {}: {}", path.display(), e);
            ExitCode::from(EXIT_INVALID_ARGS)
        });
    }

    match rules {
        Some("headgear") => Ok(classify::headgear()),
        Some("accessories") => Ok(classify::accessories()),
        Some(other) => {
            eprintln!("Error: unknown rule set '{}' (expected headgear or accessories)", other);
            Err(ExitCode::from(EXIT_INVALID_ARGS))
        }
        None => {
            eprintln!("Error: --rules or --rules-file is required");
            Err(ExitCode::from(EXIT_INVALID_ARGS))
        }
    }
}
