//! Sprite listing command implementation

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::classify::CHARACTER_NAME_ATTR;
use crate::dom::SpriteDocument;
use crate::resolver::{self, TargetKind};

use super::{check_format, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the sprites command: enumerate sprite ids and how each resolves.
pub fn run_sprites(file: &Path, format: &str) -> ExitCode {
    if let Err(code) = check_format(format) {
        return code;
    }

    let text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", file.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let doc = match SpriteDocument::parse(&text) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}: {}", file.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut entries = Vec::new();
    for id in resolver::sprite_ids(&doc) {
        let targets = resolver::resolve_targets(&doc, Some(&id)).unwrap_or_default();
        let name = doc
            .find_by_id(&id)
            .and_then(|el| el.attr(CHARACTER_NAME_ATTR))
            .unwrap_or_default()
            .to_string();
        entries.push((id, name, targets.into_iter().next()));
    }

    if format == "json" {
        let json: Vec<_> = entries
            .iter()
            .map(|(id, name, target)| {
                serde_json::json!({
                    "id": id,
                    "name": name,
                    "kind": target.as_ref().map(|t| match t.kind {
                        TargetKind::Direct => "direct",
                        TargetKind::Referenced => "referenced",
                    }),
                    "container": target.as_ref().map(|t| t.container_id.clone()),
                })
            })
            .collect();
        println!("{}", serde_json::json!({ "sprites": json }));
        return ExitCode::from(EXIT_SUCCESS);
    }

    if entries.is_empty() {
        println!("No sprites found in {}", file.display());
        return ExitCode::from(EXIT_SUCCESS);
    }

    for (id, name, target) in &entries {
        let label = if name.is_empty() { String::new() } else { format!(" ({})", name) };
        match target {
            Some(t) if t.kind == TargetKind::Direct => println!("{}{} - direct", id, label),
            Some(t) => println!("{}{} -> {}", id, label, t.container_id),
            None => println!("{}{} - no geometry", id, label),
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}
