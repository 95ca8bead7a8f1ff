//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// envr - Resolve configuration values by path and qualifiers
#[derive(Parser, Debug)]
#[command(name = "envr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve a path to its best value
    ///
    /// Values come from properties (-p and the settings file) and from
    /// environment variables, in that order of precedence.
    ///
    /// Examples:
    ///   envr resolve /port:int -p port=8080
    ///   envr resolve /timeout:long -q env=prod --config envr.toml
    ///   envr resolve /:Qualifiers -q env=prod -q region=eu
    Resolve {
        /// Absolute path to resolve, e.g. /db.port:int
        path: String,

        /// Root qualifier as name=value (repeatable)
        #[arg(short = 'q', long = "qualifier", value_parser = parse_key_val)]
        qualifiers: Vec<(String, String)>,

        /// Property as name=value (repeatable)
        #[arg(short = 'p', long = "property", value_parser = parse_key_val)]
        properties: Vec<(String, String)>,

        /// Settings file (TOML)
        #[arg(long, env = "ENVR_CONFIG")]
        config: Option<PathBuf>,

        /// Prefix for environment variable names
        #[arg(long)]
        env_prefix: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Parse a path and show its elements
    Parse {
        /// Path to parse
        path: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the built-in type names
    Types {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    if name.is_empty() {
        return Err(format!("missing name in '{s}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
