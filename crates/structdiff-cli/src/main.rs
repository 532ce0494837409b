//! structdiff CLI
//!
//! Command-line interface for comparing JSON documents

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "structdiff")]
#[command(about = "structdiff - Deep structural comparison of JSON documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two documents and list their differences
    Compare(commands::compare::CompareArgs),
    /// Compare two documents and print the difference tree
    Tree(commands::tree::TreeArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare(args) => commands::compare::execute(args),
        Commands::Tree(args) => commands::tree::execute(args),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
