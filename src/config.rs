use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Symptom Checker";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528:free";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_TOP_P: f32 = 0.9;

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_API_URL: &str = "SYMPTOM_CHECKER_API_URL";
pub const ENV_MODEL: &str = "SYMPTOM_CHECKER_MODEL";
pub const ENV_REFERER: &str = "SYMPTOM_CHECKER_REFERER";

/// Default `RUST_LOG`-style filter when the environment sets none.
pub fn default_log_filter() -> &'static str {
    "symptom_checker=info,warn"
}

/// Get the application data directory (`<data dir>/symptom-checker`).
/// Falls back to the working directory when the platform has no data dir.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("symptom-checker")
}

/// Default location of the record database.
pub fn database_path() -> PathBuf {
    app_data_dir().join("records.db")
}

/// Settings for the remote urgency-assessment model.
///
/// Passed explicitly into the analyzer; the credential only ever comes from
/// here (typically [`AnalysisConfig::from_env`]).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    /// Sent as `HTTP-Referer`; OpenRouter uses it for app attribution.
    pub referer: Option<String>,
    /// Sent as `X-Title`.
    pub app_title: Option<String>,
    /// `None` keeps the HTTP client's own default.
    pub timeout_secs: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
            referer: None,
            app_title: Some(APP_NAME.to_string()),
            timeout_secs: None,
        }
    }
}

impl AnalysisConfig {
    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            api_key: non_blank(Some(api_key.to_string())),
            ..Self::default()
        }
    }

    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_blank(lookup(ENV_API_KEY)),
            endpoint: non_blank(lookup(ENV_API_URL)).unwrap_or(defaults.endpoint),
            model: non_blank(lookup(ENV_MODEL)).unwrap_or(defaults.model),
            referer: non_blank(lookup(ENV_REFERER)),
            ..defaults
        }
    }

    /// True only for a non-blank API key.
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_have_no_credential() {
        let config = AnalysisConfig::default();
        assert!(!config.has_credential());
        assert_eq!(config.endpoint, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = AnalysisConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_MODEL, "openai/gpt-4o-mini"),
            (ENV_API_URL, "http://localhost:9999/v1/chat/completions"),
        ]));
        assert!(config.has_credential());
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.endpoint, "http://localhost:9999/v1/chat/completions");
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = AnalysisConfig::from_lookup(lookup(&[(ENV_API_KEY, "   ")]));
        assert!(!config.has_credential());
        assert!(config.api_key.is_none());
        assert!(!AnalysisConfig::with_api_key("").has_credential());
    }

    #[test]
    fn app_data_dir_is_named_for_app() {
        assert!(app_data_dir().ends_with("symptom-checker"));
        assert!(database_path().starts_with(app_data_dir()));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
