//! PanZoom CLI
//!
//! Ken Burns slideshow generator driving ffmpeg filter graphs.
//!
//! # Usage
//!
//! ```bash
//! panzoom video -i photos/ -a music.mp3 -o slideshow.mp4
//! panzoom video -i photos/ -a music.mp3 --preset cinematic --export youtube
//! panzoom video -i photos/ -a music.mp3 --dry-run
//! panzoom transitions
//! panzoom init
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use panzoom_cli::cli::{commands, Cli, Commands};
use panzoom_cli::utils::logging::init_logging;

/// Main entry point for the PanZoom CLI
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    info!("Starting PanZoom");

    match cli.command {
        Commands::Video(args) => {
            info!("Executing video command");
            commands::video(args)?;
        }
        Commands::Presets => commands::presets()?,
        Commands::Transitions => commands::transitions()?,
        Commands::Exports => commands::exports()?,
        Commands::Init(args) => {
            info!("Executing init command");
            commands::init(args)?;
        }
    }

    Ok(())
}
