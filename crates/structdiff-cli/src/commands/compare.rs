//! Compare command
//!
//! Usage: structdiff compare <LEFT> <RIGHT> [OPTIONS]

use clap::Args;

use structdiff_core::diff::render_human_summary;
use structdiff_core::reflect::TypeDesc;

use super::{ComparisonArgs, OutputFormat};

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub comparison: ComparisonArgs,
}

/// Execute compare command; `Ok(true)` when the documents are equal
pub fn execute(args: CompareArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let (comparer, left, right) = args.comparison.prepare()?;
    let (equal, differences) =
        comparer.compare_values_with_differences(&TypeDesc::any(), &left, &right)?;

    match args.comparison.format {
        OutputFormat::Text => {
            if equal {
                println!("No differences.");
            } else {
                for difference in &differences {
                    println!("{}", difference);
                }
                println!("{} difference(s)", differences.len());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&differences)?),
        OutputFormat::Markdown => print!("{}", render_human_summary(&differences)),
    }

    Ok(equal)
}
