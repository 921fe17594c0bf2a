//! CLI module - Command-line interface for comicvault
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::constants::keys::{DEFAULT_BULK_COUNT, DEFAULT_BULK_PREFIX};

/// comicvault - subscription-gated comic reading backend
#[derive(Parser)]
#[command(name = "comicvault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "web", alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create the bootstrap admin, or reset its password, role and key
    CreateAdmin,

    /// Generate numbered access keys
    GenerateKeys {
        /// Number of keys to create
        #[arg(long, default_value_t = DEFAULT_BULK_COUNT)]
        count: u32,
        /// Key prefix, keys are named PREFIX_0001, PREFIX_0002, ...
        #[arg(long, default_value = DEFAULT_BULK_PREFIX)]
        prefix: String,
        /// Days until the keys expire (never when omitted)
        #[arg(long)]
        expires_days: Option<i64>,
    },

    /// Fill an empty catalog with generated demo comics
    Seed {
        /// Number of comics to generate (defaults to catalog.demo_comic_count)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Print a summary of the stored data
    #[command(alias = "view")]
    ViewData,
}

pub use commands::*;
