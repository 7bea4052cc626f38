//! Configuration
//!
//! Optional `.fnnote.json` in the project root. Every field has a default so
//! a partial file (or none at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotate::note::{NoteLocale, NoteTemplate};
use crate::error::{NoteError, Result};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".fnnote.json";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File extensions to annotate (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names (glob syntax) pruned during traversal
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Descend into hidden directories
    #[serde(default)]
    pub include_hidden: bool,

    /// Note text settings
    #[serde(default)]
    pub note: NoteConfig,

    /// Number of parallel workers (default: number of CPUs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore: default_ignore(),
            include_hidden: false,
            note: NoteConfig::default(),
            workers: None,
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| NoteError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save config to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content + "\n")?;
        Ok(())
    }

    /// Load an explicit config file, or `.fnnote.json` in `dir` when it
    /// exists, or defaults. A malformed file is an error, never defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = dir.join(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Template used to render notes
    pub fn note_template(&self) -> NoteTemplate {
        NoteTemplate {
            locale: self.note.locale,
            empty_placeholder: self.note.empty_placeholder.clone(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["js".to_string()]
}

fn default_ignore() -> Vec<String> {
    vec![
        // Package managers
        "node_modules".to_string(),
        // VCS
        ".git".to_string(),
        // Build outputs
        "build".to_string(),
        "dist".to_string(),
        // Cache
        "__pycache__".to_string(),
    ]
}

/// Note text configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteConfig {
    /// Language of the generated text
    #[serde(default)]
    pub locale: NoteLocale,

    /// Replacement for the locale's empty-parameter placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_placeholder: Option<String>,
}
