//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod colors;
mod replace;
mod restore;
mod sprites;
mod strip;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Spritemod - substitute and recolor sprites across SVG animation frames
#[derive(Parser)]
#[command(name = "spritemod")]
#[command(about = "Spritemod - substitute and recolor sprites across SVG animation frames")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replace a sprite's geometry in one frame file
    Replace {
        /// Frame SVG file to modify
        file: PathBuf,

        /// SVG file providing the replacement <path> geometry
        replacement: PathBuf,

        /// Target sprite id (defaults to the first sprite in the frame)
        #[arg(long)]
        sprite: Option<String>,

        /// Write the result here instead of modifying the file in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a replacement to every frame of a collection
    Apply {
        /// Collection directory holding the frame files
        dir: PathBuf,

        /// SVG file providing the replacement <path> geometry
        replacement: PathBuf,

        /// Target sprite id (without it, every sprite in each frame is replaced)
        #[arg(long)]
        sprite: Option<String>,

        /// JSON file with prior modifications (recolors, attribute snapshot)
        /// to reapply after substitution
        #[arg(long)]
        modifications: Option<PathBuf>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the color literals a sprite paints with
    Colors {
        /// Frame SVG file
        file: PathBuf,

        /// Sprite id to inspect
        #[arg(long)]
        sprite: String,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Replace one color with another across a whole frame
    Recolor {
        /// Frame SVG file to modify
        file: PathBuf,

        /// Color to replace (hex, rgb() or named)
        old: String,

        /// Replacement color
        new: String,

        /// Write the result here instead of modifying the file in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List sprite ids in a frame and how each one resolves
    Sprites {
        /// Frame SVG file
        file: PathBuf,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Remove or hide classified elements across a collection
    Strip {
        /// Collection directory holding the frame files
        dir: PathBuf,

        /// Built-in rule set: headgear or accessories
        #[arg(long, conflicts_with = "rules_file")]
        rules: Option<String>,

        /// JSON file with a custom classification rule table
        #[arg(long)]
        rules_file: Option<PathBuf>,

        /// Toggle visibility instead of removing elements
        #[arg(long)]
        toggle: bool,
    },

    /// Restore a collection's frames from its backups
    Restore {
        /// Collection directory
        dir: PathBuf,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replace { file, replacement, sprite, output } => {
            replace::run_replace(&file, &replacement, sprite.as_deref(), output.as_deref())
        }
        Commands::Apply { dir, replacement, sprite, modifications, format } => replace::run_apply(
            &dir,
            &replacement,
            sprite.as_deref(),
            modifications.as_deref(),
            &format,
        ),
        Commands::Colors { file, sprite, format } => colors::run_colors(&file, &sprite, &format),
        Commands::Recolor { file, old, new, output } => {
            colors::run_recolor(&file, &old, &new, output.as_deref())
        }
        Commands::Sprites { file, format } => sprites::run_sprites(&file, &format),
        Commands::Strip { dir, rules, rules_file, toggle } => {
            strip::run_strip(&dir, rules.as_deref(), rules_file.as_deref(), toggle)
        }
        Commands::Restore { dir, format } => restore::run_restore(&dir, &format),
    }
}

/// Validate a --format value shared by several commands.
pub(crate) fn check_format(format: &str) -> Result<(), ExitCode> {
    if format == "text" || format == "json" {
        Ok(())
    } else {
        eprintln!("Error: --format must be 'text' or 'json'");
        Err(ExitCode::from(EXIT_INVALID_ARGS))
    }
}
