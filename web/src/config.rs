use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "authToken";
pub const DEFAULT_SESSION_CHECK_SECS: u64 = 5;
/// Slots per day agreed with the backend for occupancy colouring.
pub const DEFAULT_SLOTS_PER_DAY: u32 = 10;
pub const DEFAULT_LEAD_HOURS: u32 = 24;

/// Client-side settings. Every field has a working default so the app runs
/// against a local backend with no environment at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_storage_key: String,
    pub session_check_interval: Duration,
    pub slots_per_day: u32,
    pub default_lead_hours: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
            session_check_interval: Duration::from_secs(DEFAULT_SESSION_CHECK_SECS),
            slots_per_day: DEFAULT_SLOTS_PER_DAY,
            default_lead_hours: DEFAULT_LEAD_HOURS,
        }
    }
}

impl ClientConfig {
    /// Builds a config from any key lookup. Missing keys keep the default,
    /// unparseable ones keep the default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let token_storage_key = lookup("AUTH_TOKEN_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(defaults.token_storage_key);

        let session_check_secs = parse_or("SESSION_CHECK_SECS", &lookup, DEFAULT_SESSION_CHECK_SECS);

        Self {
            api_base_url,
            token_storage_key,
            // a zero interval would spin the timer
            session_check_interval: Duration::from_secs(session_check_secs.max(1)),
            slots_per_day: parse_or("SLOTS_PER_DAY", &lookup, defaults.slots_per_day),
            default_lead_hours: parse_or("DEFAULT_LEAD_HOURS", &lookup, defaults.default_lead_hours),
        }
    }

    /// Reads the process environment. Used by the server binary after
    /// `.env` has been loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings baked into the browser bundle at compile time.
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                "API_BASE_URL" => option_env!("API_BASE_URL"),
                "AUTH_TOKEN_KEY" => option_env!("AUTH_TOKEN_KEY"),
                "SESSION_CHECK_SECS" => option_env!("SESSION_CHECK_SECS"),
                "SLOTS_PER_DAY" => option_env!("SLOTS_PER_DAY"),
                "DEFAULT_LEAD_HOURS" => option_env!("DEFAULT_LEAD_HOURS"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparseable config value");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.session_check_interval, Duration::from_secs(5));
        assert_eq!(config.slots_per_day, 10);
        assert_eq!(config.default_lead_hours, 24);
    }

    #[test]
    fn overrides_are_applied_and_trailing_slash_trimmed() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("API_BASE_URL", "https://api.example.com/"),
            ("AUTH_TOKEN_KEY", "token"),
            ("SESSION_CHECK_SECS", "30"),
            ("SLOTS_PER_DAY", "12"),
        ]));
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.token_storage_key, "token");
        assert_eq!(config.session_check_interval, Duration::from_secs(30));
        assert_eq!(config.slots_per_day, 12);
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("DEFAULT_LEAD_HOURS", "soon"),
            ("SESSION_CHECK_SECS", "0"),
        ]));
        assert_eq!(config.default_lead_hours, DEFAULT_LEAD_HOURS);
        assert_eq!(config.session_check_interval, Duration::from_secs(1));
    }
}
