//! Restore command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::backup::{self, RestoreStatus};

use super::{check_format, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the restore command: copy every backup of a collection back over
/// its live file.
pub fn run_restore(dir: &Path, format: &str) -> ExitCode {
    if let Err(code) = check_format(format) {
        return code;
    }

    let outcomes = match backup::restore_all(dir) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let restored = outcomes.iter().filter(|o| o.status == RestoreStatus::Restored).count();
    let errors = outcomes.len() - restored;

    if format == "json" {
        println!(
            "{}",
            serde_json::json!({
                "message": format!("Restored {} files, {} errors", restored, errors),
                "results": outcomes,
            })
        );
    } else {
        for outcome in &outcomes {
            match &outcome.message {
                Some(message) => println!("{}: error ({})", outcome.path, message),
                None => println!("{}: restored", outcome.path),
            }
        }
        println!("Restored {} files, {} errors", restored, errors);
    }

    if errors > 0 {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
