// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use lensflip::LensFacing;
use lensflip::app::AppModel;
use lensflip::constants::ui;
use lensflip::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "lensflip")]
#[command(about = "Minimal front/back camera for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List {
        /// Print the camera list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Take a photo
    Photo {
        /// Lens to use when no camera index is given (back or front)
        #[arg(short, long, default_value = "back", value_parser = parse_facing)]
        facing: LensFacing,

        /// Camera index to use (from 'lensflip list'), overrides --facing
        #[arg(short, long)]
        camera: Option<usize>,

        /// Output file or directory (default: ~/Pictures/Camera/IMG_TIMESTAMP.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_facing(value: &str) -> Result<LensFacing, String> {
    LensFacing::parse(value).ok_or_else(|| format!("unknown lens '{value}', use back or front"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=lensflip=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { json }) => cli::list_cameras(json),
        Some(Commands::Photo {
            facing,
            camera,
            output,
        }) => cli::take_photo(facing, camera, output),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(ui::MIN_WINDOW_WIDTH)
            .min_height(ui::MIN_WINDOW_HEIGHT),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
