//! Command implementations for the degloop CLI
//!
//! This module contains the implementations for each CLI command:
//! - collapse: Run the removal engine and write the generalized network
//! - scan: Detect and report cycles without mutating anything

pub mod collapse;
pub mod scan;

use miette::Result;

use crate::cli::Commands;

/// Execute a command based on CLI input
pub fn execute_command(command: Commands) -> Result<()> {
    match &command {
        Commands::Collapse { .. } => collapse::execute_collapse_command(command),
        Commands::Scan { .. } => scan::execute_scan_command(command),
    }
}
