//! Configuration management for the marcup CLI
//!
//! All external collaborators (service URL, access token, storage location,
//! notification email, configured record metadata) live in one explicit
//! `Config` value passed into the client and orchestrator; nothing is read
//! from process-wide state after startup.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "marcup.toml";

/// A configured metadata entry for the aggregate record
///
/// The key is a 6-character MARC shorthand: 3-character tag, two indicator
/// characters (`_` for blank), and the subfield code, e.g. `245__a`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataPair {
    pub key: String,
    pub value: String,
}

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Record service base URL, e.g. "https://library.example.org"
    #[serde(default)]
    pub site_url: String,

    /// Access token for the record service (never logged)
    #[serde(default)]
    pub api_token: String,

    /// Storage location identifier passed to the presigned-post endpoint
    #[serde(default)]
    pub storage_location: String,

    /// Email notified by the record API once the submission is processed
    #[serde(default)]
    pub callback_email: String,

    /// Static record metadata, appended before any file-linking fields in
    /// the order configured here
    #[serde(default)]
    pub metadata: Vec<MetadataPair>,
}

impl Config {
    /// Load configuration from a file (or the default location if present),
    /// then apply environment overrides and the command-line `site_url`
    /// override, and validate the merged result.
    ///
    /// Precedence, lowest to highest: file, environment, command line.
    pub fn load(path: Option<&Path>, site_url_override: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::empty()
                }
            },
        };

        config.apply_env();
        if let Some(url) = site_url_override {
            config.site_url = url.to_string();
        }
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `MARCUP_*` environment variable overrides
    ///
    /// Environment variables:
    /// - `MARCUP_SITE_URL`: record service base URL
    /// - `MARCUP_API_TOKEN`: access token
    /// - `MARCUP_STORAGE_LOCATION`: storage location identifier
    /// - `MARCUP_CALLBACK_EMAIL`: notification email
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("MARCUP_SITE_URL") {
            self.site_url = url;
        }
        if let Ok(token) = std::env::var("MARCUP_API_TOKEN") {
            self.api_token = token;
        }
        if let Ok(location) = std::env::var("MARCUP_STORAGE_LOCATION") {
            self.storage_location = location;
        }
        if let Ok(email) = std::env::var("MARCUP_CALLBACK_EMAIL") {
            self.callback_email = email;
        }
    }

    /// Ensure all required values are present
    pub fn validate(&self) -> Result<()> {
        if self.site_url.is_empty() {
            return Err(CliError::config("site_url is not set"));
        }
        if self.api_token.is_empty() {
            return Err(CliError::config("api_token is not set"));
        }
        if self.storage_location.is_empty() {
            return Err(CliError::config("storage_location is not set"));
        }
        if self.callback_email.is_empty() {
            return Err(CliError::config("callback_email is not set"));
        }
        Ok(())
    }

    fn empty() -> Self {
        Self {
            site_url: String::new(),
            api_token: String::new(),
            storage_location: String::new(),
            callback_email: String::new(),
            metadata: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXAMPLE: &str = r#"
site_url = "https://library.example.org"
api_token = "secret"
storage_location = "TOS"
callback_email = "ops@example.org"

[[metadata]]
key = "245__a"
value = "Test record"

[[metadata]]
key = "269__a"
value = "2021-10-14"

[[metadata]]
key = "980__a"
value = "DIGITIZED"
"#;

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.site_url, "https://library.example.org");
        assert_eq!(config.storage_location, "TOS");
        assert_eq!(config.metadata.len(), 3);
        // Configured order is preserved
        let keys: Vec<&str> = config.metadata.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["245__a", "269__a", "980__a"]);
    }

    #[test]
    fn test_validate_rejects_missing_values() {
        let mut config = Config::empty();
        assert!(config.validate().is_err());

        config.site_url = "https://library.example.org".to_string();
        config.api_token = "secret".to_string();
        config.storage_location = "TOS".to_string();
        assert!(config.validate().is_err());

        config.callback_email = "ops@example.org".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_site_url_override_supplies_missing_value() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
api_token = "secret"
storage_location = "TOS"
callback_email = "ops@example.org"
"#,
        )
        .unwrap();
        file.flush().unwrap();

        // Without the override the merged config is incomplete
        let result = Config::load(Some(file.path()), None);
        assert!(matches!(result, Err(CliError::Config(_))));

        // The command-line override satisfies validation on its own
        let config = Config::load(Some(file.path()), Some("https://other.example.org")).unwrap();
        assert_eq!(config.site_url, "https://other.example.org");
    }

    #[test]
    fn test_load_site_url_override_beats_file_value() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let config = Config::load(Some(file.path()), Some("https://other.example.org")).unwrap();
        assert_eq!(config.site_url, "https://other.example.org");
    }

    #[test]
    fn test_metadata_is_optional() {
        let config: Config = toml::from_str(
            r#"
site_url = "https://library.example.org"
api_token = "secret"
storage_location = "TOS"
callback_email = "ops@example.org"
"#,
        )
        .unwrap();
        assert!(config.metadata.is_empty());
        assert!(config.validate().is_ok());
    }
}
