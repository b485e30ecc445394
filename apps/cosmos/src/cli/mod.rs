//! # Cosmos CLI Module
//!
//! This module implements the CLI interface for Cosmos.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show row counts
//! - `init` - Initialize a new database
//! - `seed` - Insert a demo data set
//! - `add-planet` - Insert a planet
//! - `remove-planet` - Delete a planet and its missions
//! - `compact` - Reclaim free space in the database file

mod commands;

use crate::config::{Backend, ConfigError, Settings};
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Cosmos - scientists, planets and the missions between them
///
/// Serves a small mission catalog over HTTP and manages its database.
#[derive(Parser, Debug)]
#[command(name = "cosmos")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TOML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the catalog database
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Insert the demo data set if the catalog is empty
        #[arg(long)]
        seed: bool,
    },

    /// Show row counts
    Status,

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Insert a small demo data set
    Seed,

    /// Insert a planet
    AddPlanet {
        /// Planet name
        #[arg(short, long)]
        name: String,

        /// Distance from Earth
        #[arg(short, long, allow_negative_numbers = true)]
        distance: i64,

        /// Nearest star
        #[arg(short, long)]
        star: String,
    },

    /// Delete a planet and its missions
    RemovePlanet {
        /// Planet id
        #[arg(short, long)]
        id: u64,
    },

    /// Reclaim free space in the database file
    Compact,
}

impl Cli {
    /// Resolve settings: file, then environment, then the global flags.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::load(self.config.as_deref())?;
        self.apply_flags(&mut settings);
        Ok(settings)
    }

    /// Overlay the global storage flags onto already resolved settings.
    pub fn apply_flags(&self, settings: &mut Settings) {
        if let Some(database) = &self.database {
            settings.storage.database = database.clone();
        }
        if let Some(backend) = self.backend {
            settings.storage.backend = backend;
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let mut settings = cli.settings()?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port, seed }) => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            cmd_server(&settings, seed).await
        }
        Some(Commands::Status) => cmd_status(&settings.storage, json_mode),
        Some(Commands::Init { force }) => cmd_init(&settings.storage, force),
        Some(Commands::Seed) => cmd_seed(&settings.storage, json_mode),
        Some(Commands::AddPlanet {
            name,
            distance,
            star,
        }) => cmd_add_planet(&settings.storage, json_mode, &name, distance, &star),
        Some(Commands::RemovePlanet { id }) => cmd_remove_planet(&settings.storage, json_mode, id),
        Some(Commands::Compact) => cmd_compact(&settings.storage, json_mode),
        None => {
            // No subcommand - show status by default
            cmd_status(&settings.storage, json_mode)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "cosmos",
            "-B",
            "memory",
            "--json-mode",
            "add-planet",
            "--name",
            "Kepler-22b",
            "--distance",
            "-600",
            "--star",
            "Kepler-22",
        ])
        .unwrap();
        assert_eq!(cli.backend, Some(Backend::Memory));
        assert!(cli.json_mode);
        match cli.command {
            Some(Commands::AddPlanet { distance, .. }) => assert_eq!(distance, -600),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn database_flag_overrides_settings() {
        let cli = Cli::try_parse_from(["cosmos", "-D", "flag.db", "-B", "memory", "status"])
            .unwrap();
        let mut settings = Settings::default();
        settings
            .apply_overrides(|key| match key {
                "COSMOS_DB" => Some("env.db".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(settings.storage.database, PathBuf::from("env.db"));

        cli.apply_flags(&mut settings);
        assert_eq!(settings.storage.database, PathBuf::from("flag.db"));
        assert_eq!(settings.storage.backend, Backend::Memory);
    }

    #[test]
    fn absent_flags_keep_settings() {
        let cli = Cli::try_parse_from(["cosmos", "status"]).unwrap();
        let mut settings = Settings::default();
        settings.apply_overrides(|_| None).unwrap();
        let before = settings.clone();

        cli.apply_flags(&mut settings);
        assert_eq!(settings, before);
    }

    #[test]
    fn compact_parses() {
        let cli = Cli::try_parse_from(["cosmos", "compact"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Compact)));
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["cosmos", "--quiet"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.quiet);
    }
}
