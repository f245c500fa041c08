// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! fluxgate - a model-inference request relay.
//!
//! This is the binary entry point: it accepts inference requests over HTTP,
//! forwards them to the HuggingFace Inference API, and persists lifecycle
//! status and results to Supabase.

use clap::{Parser, Subcommand};

mod doctor;
mod serve;

/// fluxgate - a model-inference request relay.
#[derive(Parser, Debug)]
#[command(name = "fluxgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay HTTP server.
    Serve,
    /// Run diagnostic checks against the configured environment.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match fluxgate_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            fluxgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        None => {
            println!("fluxgate: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
