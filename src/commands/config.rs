//! Config commands: show and path

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::config::ToolboxConfig;

/// Print the effective configuration, with directories resolved
pub fn cmd_config_show(config: &ToolboxConfig, data_dir: &Path) -> Result<()> {
    let source = if ToolboxConfig::exists() {
        ToolboxConfig::config_path()?.display().to_string()
    } else {
        "defaults (no config file)".to_string()
    };
    println!("{}: {}", "Config".bold(), source.dimmed());

    println!("\n{}", "Directories".bold());
    println!("  data:   {}", data_dir.display());
    println!("  icons:  {}", config.icons_dir()?.display());
    println!("  images: {}", config.images_dir()?.display());

    println!("\n{}", "Search".bold());
    println!("  fuzzy threshold:   {}", config.search.fuzzy_threshold);
    println!("  min fuzzy length:  {}", config.search.min_fuzzy_len);

    println!("\n{}", "Display".bold());
    println!("  common tools limit: {}", config.display.common_limit);

    println!("\n{}: {}", "Log level".bold(), config.log.level);

    Ok(())
}

pub fn cmd_config_path() -> Result<()> {
    println!("{}", ToolboxConfig::config_path()?.display());
    Ok(())
}
