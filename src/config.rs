use ask_chat_core::AskOptions;

/// Environment variable holding the backend base address.
pub const API_BASE_VAR: &str = "API_BASE";
pub const ASK_WEB_VAR: &str = "ASK_WEB";
pub const ASK_WEB_DOMAINS_VAR: &str = "ASK_WEB_DOMAINS";

/// Used when no base address is configured. A terminal has no hosting page to
/// resolve relative URLs against, so it falls back to the backend's default port.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
    pub ask_options: AskOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            ask_options: AskOptions::default(),
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = lookup(API_BASE_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let web = env_bool(lookup(ASK_WEB_VAR).as_deref(), false);
        let web_domains = lookup(ASK_WEB_DOMAINS_VAR)
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Self {
            api_base,
            ask_options: AskOptions::default()
                .with_web(web)
                .with_web_domains(web_domains),
        }
    }

    /// Applies command-line overrides. Domains given on the command line
    /// replace the configured ones; `--web` can only turn the flag on.
    pub fn with_overrides(mut self, api_base: Option<String>, web: bool, web_domains: Vec<String>) -> Self {
        if let Some(base) = api_base {
            self.api_base = base;
        }
        if web {
            self.ask_options.web = true;
        }
        if !web_domains.is_empty() {
            self.ask_options.web_domains = web_domains;
        }
        self
    }
}

fn env_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_or_blank_base_falls_back_to_default() {
        assert_eq!(config(&[]).api_base, DEFAULT_API_BASE);
        assert_eq!(config(&[(API_BASE_VAR, "  ")]).api_base, DEFAULT_API_BASE);
        assert_eq!(config(&[(API_BASE_VAR, "http://qa:9000")]).api_base, "http://qa:9000");
    }

    #[test]
    fn web_flags_parse_like_the_backend() {
        let cfg = config(&[(ASK_WEB_VAR, "Yes"), (ASK_WEB_DOMAINS_VAR, "a.com, ,b.org")]);
        assert!(cfg.ask_options.web);
        assert_eq!(cfg.ask_options.web_domains, vec!["a.com", "b.org"]);

        assert!(!config(&[(ASK_WEB_VAR, "off")]).ask_options.web);
        assert!(!config(&[(ASK_WEB_VAR, "maybe")]).ask_options.web);
    }

    #[test]
    fn command_line_overrides_win() {
        let cfg = config(&[(ASK_WEB_DOMAINS_VAR, "a.com")]).with_overrides(
            Some("http://override".into()),
            true,
            vec!["c.net".into()],
        );
        assert_eq!(cfg.api_base, "http://override");
        assert!(cfg.ask_options.web);
        assert_eq!(cfg.ask_options.web_domains, vec!["c.net"]);

        let kept = config(&[(ASK_WEB_DOMAINS_VAR, "a.com")]).with_overrides(None, false, Vec::new());
        assert_eq!(kept.ask_options.web_domains, vec!["a.com"]);
        assert_eq!(kept.api_base, DEFAULT_API_BASE);
    }
}
