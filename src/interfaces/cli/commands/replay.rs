//! 事件回放命令

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use colored::Colorize;

use crate::analytics::Replayer;
use crate::interfaces::cli::{CliContext, CliError};

pub async fn replay_file(ctx: &CliContext, file: String) -> Result<(), CliError> {
    let input = File::open(&file)
        .map_err(|e| CliError::CommandError(format!("Cannot open {}: {}", file, e)))?;

    let mut replayer = Replayer::new(Arc::new(ctx.tracker()));
    replayer.feed_reader(BufReader::new(input))?;
    let stats = replayer.finish();

    println!("{} Replayed {}", "✓".green().bold(), file.blue());
    println!("  {}:      {}", "Page loads".cyan(), stats.loads);
    println!("  {}:  {}", "Other events".cyan(), stats.dispatched);
    if stats.skipped > 0 {
        println!(
            "  {}:       {}",
            "Skipped".yellow(),
            format!("{} (before first load)", stats.skipped).dimmed()
        );
    }
    if stats.invalid > 0 {
        println!("  {}:  {}", "Invalid lines".red(), stats.invalid);
    }
    Ok(())
}
