//! Suggester configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mathquiz_core::suggest::SymbolSuggester;

use crate::gemini::GeminiSuggester;
use crate::local::LocalSuggester;

/// Configuration for a single suggestion backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SuggesterConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    Local,
}

impl std::fmt::Debug for SuggesterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggesterConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            SuggesterConfig::Local => f.debug_struct("Local").finish(),
        }
    }
}

/// Top-level mathquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathquizConfig {
    /// Suggester configurations keyed by name.
    #[serde(default)]
    pub suggesters: HashMap<String, SuggesterConfig>,
    /// Default suggester to use.
    #[serde(default = "default_suggester")]
    pub default_suggester: String,
    /// Max concurrent suggestion requests during autofill.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Max retries on transient suggester errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Fall back to the deterministic scan when the suggester fails.
    #[serde(default = "default_true")]
    pub fallback_to_scan: bool,
}

fn default_suggester() -> String {
    "gemini".to_string()
}
fn default_parallelism() -> usize {
    4
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for MathquizConfig {
    fn default() -> Self {
        Self {
            suggesters: HashMap::new(),
            default_suggester: default_suggester(),
            parallelism: default_parallelism(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            fallback_to_scan: true,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a suggester config.
fn resolve_suggester_config(config: &SuggesterConfig) -> SuggesterConfig {
    match config {
        SuggesterConfig::Gemini {
            api_key,
            base_url,
            model,
        } => SuggesterConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
        },
        SuggesterConfig::Local => SuggesterConfig::Local,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mathquiz.toml` in the current directory
/// 2. `~/.config/mathquiz/config.toml`
///
/// Environment variable override: `MATHQUIZ_GEMINI_KEY`.
pub fn load_config() -> Result<MathquizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MathquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mathquiz.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<MathquizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MathquizConfig::default(),
    };

    // Apply env var override
    if let Ok(key) = std::env::var("MATHQUIZ_GEMINI_KEY") {
        config
            .suggesters
            .entry("gemini".into())
            .or_insert(SuggesterConfig::Gemini {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let Some(SuggesterConfig::Gemini { api_key, .. }) =
            config.suggesters.get_mut("gemini")
        {
            *api_key = key;
        }
    }

    // The deterministic scan needs no configuration and is always on hand.
    config
        .suggesters
        .entry("local".into())
        .or_insert(SuggesterConfig::Local);

    // Resolve env vars in all suggester configs
    let resolved: HashMap<String, SuggesterConfig> = config
        .suggesters
        .iter()
        .map(|(k, v)| (k.clone(), resolve_suggester_config(v)))
        .collect();
    config.suggesters = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathquiz"))
}

/// Create a suggester instance from its configuration.
pub fn create_suggester(config: &SuggesterConfig) -> Result<Box<dyn SymbolSuggester>> {
    match config {
        SuggesterConfig::Gemini {
            api_key,
            base_url,
            model,
        } => Ok(Box::new(GeminiSuggester::new(
            api_key,
            base_url.clone(),
            model.clone(),
        ))),
        SuggesterConfig::Local => Ok(Box::new(LocalSuggester)),
    }
}
