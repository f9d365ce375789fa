//! The `scorecard init` command.

use anyhow::Result;

use scorecard_core::config::SAMPLE_CONFIG;

pub fn execute() -> Result<()> {
    if std::path::Path::new("scorecard.toml").exists() {
        println!("scorecard.toml already exists, skipping.");
    } else {
        std::fs::write("scorecard.toml", SAMPLE_CONFIG)?;
        println!("Created scorecard.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: scorecard rubric");
    println!("  2. Run: scorecard draft set --name \"Candidate\" --date YYYY-MM-DD");
    println!("  3. Run: scorecard draft check code-quality:1 architecture:2");
    println!("  4. Run: scorecard save");

    Ok(())
}
