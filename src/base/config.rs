/// Application config.
///
/// Secrets are never stored here. The store and extractor sections only name
/// the environment variables that hold them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub page_size: usize,
    pub use_colored_output: bool,
    pub store: StoreConfig,
    pub extractor: ExtractorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 20,
            use_colored_output: false,
            store: StoreConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

/// Where receipts are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// JSON-lines file next to the config.
    #[default]
    File,
    /// PostgREST-compatible HTTP endpoint.
    #[serde(rename_all = "camelCase")]
    Rest {
        url: String,
        #[serde(default = "default_table")]
        table: String,
        #[serde(default = "default_store_key_env")]
        api_key_env: String,
    },
}

fn default_table() -> String {
    "receipts".to_string()
}

fn default_store_key_env() -> String {
    "SUPABASE_ANON_KEY".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl std::fmt::Display for Config {
    /// Writes a terminating newline.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?;
        writeln!(f, "{}", s)
    }
}

impl std::str::FromStr for Config {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl TryFrom<&str> for Config {
    type Error = <Self as std::str::FromStr>::Err;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse::<Self>()
    }
}
