use crate::config::types::{builtin_sites, Config};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Site profiles declared in the file are added to the built-in ones; a
/// profile with the same name as a built-in replaces it.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use listing_sweep::config::load_config;
///
/// let config = load_config(Path::new("sweep.toml")).unwrap();
/// println!("Concurrency: {}", config.crawler.concurrency_limit);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text, merging the built-in site profiles
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    // Parse TOML
    let mut config: Config = toml::from_str(content)?;

    // Declared profiles replace built-ins of the same name
    let mut sites = builtin_sites();
    for site in config.sites.drain(..) {
        sites.retain(|existing| !existing.name.eq_ignore_ascii_case(&site.name));
        sites.push(site);
    }
    config.sites = sites;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be tied to the same settings.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-pages-ceiling = 50
concurrency-limit = 8
request-timeout-secs = 20
connect-timeout-secs = 5

[user-agent]
value = "TestAgent/1.0"

[[site]]
name = "ghana-homes"
hosts = ["*.ghanahomes.example"]
origin = "https://www.ghanahomes.example"
pagination-suffix = "?page={page}"
card-selectors = ["article.property"]
price-selectors = [".amount"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages_ceiling, 50);
        assert_eq!(config.crawler.concurrency_limit, 8);
        assert_eq!(config.user_agent.value, "TestAgent/1.0");
        // built-in mubawab plus the declared profile
        assert_eq!(config.sites.len(), 2);
        assert!(config.sites.iter().any(|s| s.name == "ghana-homes"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages_ceiling, 200);
        assert_eq!(config.crawler.concurrency_limit, 5);
        assert_eq!(config.crawler.request_timeout_secs, 15);
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites[0].name, "mubawab");
    }

    #[test]
    fn test_site_overrides_builtin() {
        let config_content = r#"
[[site]]
name = "mubawab"
origin = "https://www.mubawab.ma"
pagination-suffix = ":p:{page}"
card-selectors = ["li.listingBox"]
"#;
        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites[0].card_selectors, vec!["li.listingBox"]);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/sweep.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
concurrency-limit = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
