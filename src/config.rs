//! Keyword and website configuration loading.
//!
//! The authoritative lists live in an external spreadsheet; this module is
//! the narrow interface the pipeline sees. A YAML file with the same two
//! tables stands in for the spreadsheet, and a built-in demo set mirrors
//! what the collector falls back to when no sheet is reachable.
//!
//! ```yaml
//! keywords:
//!   - { keyword: election, language: English }
//! websites:
//!   - { name: BBC News, url: "https://www.bbc.com/news", language: English }
//! ```

use crate::error::ConfigError;
use crate::models::{KeywordConfig, WebsiteConfig};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Where the keyword and website lists come from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A YAML file with `keywords:` and `websites:` tables.
    File(String),
    /// The built-in demo lists.
    Demo,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    keywords: Vec<KeywordConfig>,
    #[serde(default)]
    websites: Vec<WebsiteConfig>,
}

impl ConfigSource {
    /// Load and validate the keyword list.
    #[instrument(level = "info", skip_all)]
    pub async fn load_keywords(&self) -> Result<Vec<KeywordConfig>, ConfigError> {
        let raw = match self {
            ConfigSource::File(path) => read_file(path).await?.keywords,
            ConfigSource::Demo => demo_keywords(),
        };
        let keywords = clean_keywords(raw);
        if keywords.is_empty() {
            return Err(ConfigError::Empty("keyword"));
        }
        info!(count = keywords.len(), "Loaded keywords");
        Ok(keywords)
    }

    /// Load and validate the website list.
    #[instrument(level = "info", skip_all)]
    pub async fn load_websites(&self) -> Result<Vec<WebsiteConfig>, ConfigError> {
        let raw = match self {
            ConfigSource::File(path) => read_file(path).await?.websites,
            ConfigSource::Demo => demo_websites(),
        };
        let websites = clean_websites(raw);
        if websites.is_empty() {
            return Err(ConfigError::Empty("website"));
        }
        info!(count = websites.len(), "Loaded websites");
        Ok(websites)
    }
}

async fn read_file(path: &str) -> Result<ConfigFile, ConfigError> {
    let text = tokio::fs::read_to_string(Path::new(path))
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
    parse_config(path, &text)
}

fn parse_config(path: &str, text: &str) -> Result<ConfigFile, ConfigError> {
    if text.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Trim every field and drop rows with a blank field, like short sheet rows.
fn clean_keywords(raw: Vec<KeywordConfig>) -> Vec<KeywordConfig> {
    raw.into_iter()
        .filter_map(|k| {
            let keyword = k.keyword.trim().to_string();
            let language = k.language.trim().to_string();
            if keyword.is_empty() || language.is_empty() {
                warn!(?k, "Skipping incomplete keyword row");
                return None;
            }
            Some(KeywordConfig { keyword, language })
        })
        .collect()
}

fn clean_websites(raw: Vec<WebsiteConfig>) -> Vec<WebsiteConfig> {
    raw.into_iter()
        .filter_map(|w| {
            let name = w.name.trim().to_string();
            let url = w.url.trim().to_string();
            let language = w.language.trim().to_string();
            if name.is_empty() || url.is_empty() || language.is_empty() {
                warn!(?w, "Skipping incomplete website row");
                return None;
            }
            Some(WebsiteConfig { name, url, language })
        })
        .collect()
}

fn keyword(keyword: &str, language: &str) -> KeywordConfig {
    KeywordConfig {
        keyword: keyword.to_string(),
        language: language.to_string(),
    }
}

fn website(name: &str, url: &str, language: &str) -> WebsiteConfig {
    WebsiteConfig {
        name: name.to_string(),
        url: url.to_string(),
        language: language.to_string(),
    }
}

pub fn demo_keywords() -> Vec<KeywordConfig> {
    vec![
        keyword("election", "English"),
        keyword("budget", "English"),
        keyword("cricket", "English"),
        keyword("चुनाव", "Hindi"),
        keyword("बजट", "Hindi"),
    ]
}

pub fn demo_websites() -> Vec<WebsiteConfig> {
    vec![
        website("BBC News", "https://www.bbc.com/news", "English"),
        website("CNN", "https://www.cnn.com", "English"),
        website("The Hindu", "https://www.thehindu.com", "English"),
        website("Aaj Tak", "https://www.aajtaak.in", "Hindi"),
        website("NDTV", "https://www.ndtv.com", "Hindi"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config_tables() {
        let yaml = r#"
keywords:
  - { keyword: " election ", language: English }
  - { keyword: "", language: English }
websites:
  - { name: BBC News, url: "https://www.bbc.com/news", language: English }
"#;
        let file = parse_config("test.yaml", yaml).unwrap();
        assert_eq!(file.keywords.len(), 2);
        assert_eq!(file.websites.len(), 1);

        let keywords = clean_keywords(file.keywords);
        assert_eq!(keywords, vec![keyword("election", "English")]);
    }

    #[test]
    fn test_parse_config_rejects_malformed_yaml() {
        let err = parse_config("bad.yaml", "keywords: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_missing_table_is_empty_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "keywords:\n  - {{ keyword: budget, language: English }}").unwrap();
        let source = ConfigSource::File(file.path().to_string_lossy().into_owned());

        assert_eq!(source.load_keywords().await.unwrap().len(), 1);
        let err = source.load_websites().await.unwrap_err();
        assert!(matches!(err, ConfigError::Empty("website")));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_read_error() {
        let source = ConfigSource::File("/definitely/not/here.yaml".to_string());
        let err = source.load_keywords().await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn test_demo_lists_are_valid() {
        let keywords = ConfigSource::Demo.load_keywords().await.unwrap();
        let websites = ConfigSource::Demo.load_websites().await.unwrap();
        assert_eq!(keywords.len(), 5);
        assert_eq!(websites.len(), 5);
        assert!(websites.iter().any(|w| w.language == "Hindi"));
    }
}
