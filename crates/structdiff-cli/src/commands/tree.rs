//! Tree command
//!
//! Usage: structdiff tree <LEFT> <RIGHT> [OPTIONS] [--keep-empty]

use clap::Args;

use structdiff_core::diff::render_tree_summary;
use structdiff_core::reflect::TypeDesc;

use super::{ComparisonArgs, OutputFormat};

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub comparison: ComparisonArgs,

    /// Keep branches without differences
    #[arg(long)]
    pub keep_empty: bool,
}

/// Execute tree command; `Ok(true)` when the documents are equal
pub fn execute(args: TreeArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let (comparer, left, right) = args.comparison.prepare()?;
    let mut tree = comparer.compare_values_with_tree(&TypeDesc::any(), &left, &right)?;
    if !args.keep_empty {
        tree.shrink();
    }

    match args.comparison.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree.report())?),
        OutputFormat::Text | OutputFormat::Markdown => print!("{}", render_tree_summary(&tree)),
    }

    Ok(!tree.has_differences())
}
