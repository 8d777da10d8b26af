use std::path::PathBuf;

use anyhow::anyhow;

pub struct Config {
    pub input_path: PathBuf,
    pub reference: String,
    pub focus: Option<String>,
    pub pretty: bool,
    pub log_format: String,
}

impl Config {
    /// Reads the configuration from the process environment (and `.env`).
    /// The first positional argument, if any, overrides `FXCHAIN_INPUT`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if let Some(path) = std::env::args().nth(1) {
            config.input_path = PathBuf::from(path);
        }
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input_path = lookup("FXCHAIN_INPUT")
            .unwrap_or_else(|| "chain.json".into())
            .into();
        let reference = lookup("FXCHAIN_REFERENCE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("FXCHAIN_REFERENCE must name the reference currency"))?;
        let focus = lookup("FXCHAIN_FOCUS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let pretty = lookup("FXCHAIN_PRETTY")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let log_format = lookup("FXCHAIN_LOG_FORMAT").unwrap_or_else(|| "text".to_string());

        Ok(Self {
            input_path,
            reference,
            focus,
            pretty,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("FXCHAIN_REFERENCE", "USD")])).unwrap();
        assert_eq!(config.input_path, PathBuf::from("chain.json"));
        assert_eq!(config.reference, "USD");
        assert_eq!(config.focus, None);
        assert!(!config.pretty);
        assert_eq!(config.log_format, "text");
    }

    #[test]
    fn test_reference_is_required() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("FXCHAIN_REFERENCE", "  ")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FXCHAIN_INPUT", "/tmp/ledger.json"),
            ("FXCHAIN_REFERENCE", "1"),
            ("FXCHAIN_FOCUS", "2"),
            ("FXCHAIN_PRETTY", "TRUE"),
            ("FXCHAIN_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.input_path, PathBuf::from("/tmp/ledger.json"));
        assert_eq!(config.focus.as_deref(), Some("2"));
        assert!(config.pretty);
        assert_eq!(config.log_format, "json");
    }
}
