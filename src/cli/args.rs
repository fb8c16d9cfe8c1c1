//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::StreamType;

/// Inspect and edit copy-on-write switch state snapshots
#[derive(Parser, Debug)]
#[command(name = "swstate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the state tree
    Show {
        /// Snapshot file (default: state_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Load and validate a snapshot
    Check {
        /// Snapshot file (default: state_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Change one queue and save the new snapshot
    SetQueue {
        /// Snapshot file (default: state_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Port id
        #[arg(long)]
        port: u16,

        /// Queue id on that port
        #[arg(long)]
        queue: u8,

        /// Scheduling weight
        #[arg(long)]
        weight: Option<i32>,

        /// Queue priority
        #[arg(long)]
        priority: Option<i32>,

        /// UNICAST, MULTICAST or ALL
        #[arg(long, value_parser = parse_stream_type)]
        stream_type: Option<StreamType>,

        /// Show the result without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn parse_stream_type(s: &str) -> Result<StreamType, String> {
    s.parse().map_err(|e: crate::domain::DomainError| e.to_string())
}
