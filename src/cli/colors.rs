//! Color inspection and recolor command implementations

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::dom::SpriteDocument;
use crate::recolor;

use super::{check_format, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the colors command: list the literals a sprite paints with.
pub fn run_colors(file: &Path, sprite: &str, format: &str) -> ExitCode {
    if let Err(code) = check_format(format) {
        return code;
    }

    let doc = match read_document(file) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let colors = match recolor::extract_colors(&doc, sprite) {
        Ok(colors) => colors,
        Err(e) => {
            eprintln!("Error: {}: {}", file.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if format == "json" {
        println!("{}", serde_json::json!({ "sprite": sprite, "colors": colors }));
    } else if colors.is_empty() {
        println!("No colors found on {}", sprite);
    } else {
        for color in &colors {
            println!("{}", color);
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the recolor command: global color substitution in one frame.
pub fn run_recolor(file: &Path, old: &str, new: &str, output: Option<&Path>) -> ExitCode {
    let mut doc = match read_document(file) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let mutations = recolor::recolor(&mut doc, old, new);

    let target = output.unwrap_or(file);
    if let Err(e) = fs::write(target, doc.serialize()) {
        eprintln!("Error: cannot write {}: {}", target.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "Recolored {} occurrence{} of {} in {}",
        mutations,
        if mutations == 1 { "" } else { "s" },
        old,
        target.display()
    );
    ExitCode::from(EXIT_SUCCESS)
}

fn read_document(file: &Path) -> Result<SpriteDocument, ExitCode> {
    let text = fs::read_to_string(file).map_err(|e| {
        eprintln!("Error: cannot read {}: {}", file.display(), e);
        ExitCode::from(EXIT_ERROR)
    })?;
    SpriteDocument::parse(&text).map_err(|e| {
        eprintln!("Error: {}: {}", file.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}
