//! Init command - write an example user config

use anyhow::Result;
use console::style;
use dataprobe::config::UserConfig;

/// Run the init command
pub fn run() -> Result<()> {
    let (config_path, created) = UserConfig::init_user_config()?;

    if !created {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    } else {
        println!(
            "{} Created {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    }

    println!("\n{}", style("Next steps:").bold());
    println!("  1. Set ANTHROPIC_API_KEY (or pick another backend in the config) for --insights");
    println!("  2. Run {}", style("dataprobe profile <FILE>").cyan());
    Ok(())
}
