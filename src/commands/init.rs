//! Init command
//!
//! Implements `fnnote init`: write a config file holding the defaults.

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::config::{Config, DEFAULT_CONFIG_FILE};

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Where to write the config
    pub output: PathBuf,
    /// Overwrite an existing config
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_CONFIG_FILE),
            force: false,
        }
    }
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.output.exists() && !options.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            options.output.display()
        );
    }

    Config::default().save(&options.output)?;
    println!(
        "{} Created {}",
        style("✓").green(),
        options.output.display()
    );
    Ok(())
}
