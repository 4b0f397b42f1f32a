use std::path::Path;

use serde::{Deserialize, Serialize};

/// Name of the settings file looked up next to the document.
pub const FILE_NAME: &str = "sitedoc.toml";

/// Configuration for rendering website documents.
///
/// This struct holds presentation settings that only affect how a document
/// is written back to disk. The document structure itself is not
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The XSL stylesheet referenced from the saved document.
    ///
    /// When set, an `<?xml-stylesheet type="text/xsl" href="..."?>`
    /// instruction is written after the XML declaration.
    stylesheet: Option<String>,

    /// Number of spaces per nesting level in the saved document.
    ///
    /// Zero writes the document on a single line.
    indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stylesheet: default_stylesheet(),
            indent: default_indent(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration that sits beside `document`, falling back to
    /// the defaults if there is none or it cannot be parsed.
    #[must_use]
    pub fn for_document(document: &Path) -> Self {
        let path = document
            .parent()
            .map_or_else(|| Path::new(FILE_NAME).to_path_buf(), |dir| dir.join(FILE_NAME));

        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Using default config ({}): {e}", path.display());
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the stylesheet referenced from saved documents, if any.
    #[must_use]
    pub fn stylesheet(&self) -> Option<&str> {
        self.stylesheet.as_deref()
    }

    /// Sets or clears the stylesheet reference.
    pub fn set_stylesheet(&mut self, stylesheet: Option<String>) {
        self.stylesheet = stylesheet;
    }

    /// Returns the indentation width for saved documents.
    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }

    /// Sets the indentation width.
    pub const fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }
}

fn default_stylesheet() -> Option<String> {
    Some("style.xsl".to_string())
}

const fn default_indent() -> usize {
    2
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// An empty string disables the stylesheet instruction.
        #[serde(default = "default_stylesheet_string")]
        stylesheet: String,

        #[serde(default = "default_indent")]
        indent: usize,
    },
}

fn default_stylesheet_string() -> String {
    default_stylesheet().unwrap_or_default()
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 { stylesheet, indent } => Self {
                stylesheet: Some(stylesheet).filter(|s| !s.is_empty()),
                indent,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            stylesheet: config.stylesheet.unwrap_or_default(),
            indent: config.indent,
        }
    }
}
