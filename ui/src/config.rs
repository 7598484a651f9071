//! Application settings baked in at build time.
//!
//! The UI ships as a static bundle, so settings come from `option_env!` when
//! the bundle is compiled. Every key has a development default.

use std::sync::OnceLock;

pub const DEFAULT_API_URL: &str = "http://localhost:12000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub app: AppInfo,
    pub features: Features,
    pub development: Development,
    pub auth: AuthConfig,
    pub pagination: Pagination,
    pub ui: UiTiming,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub analytics: bool,
    pub chat: bool,
    pub notifications: bool,
    pub exercise_tracking: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Development {
    pub debug_mode: bool,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    pub token_storage_key: String,
    pub user_storage_key: String,
    pub session_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiTiming {
    pub analytics_refresh_interval_ms: u32,
    pub notification_timeout_ms: u32,
    pub max_notifications: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Build the configuration from a key lookup, falling back to defaults
    /// for missing keys and for values that do not parse.
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let string = |key: &str, default: &str| {
            lookup(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map_or_else(|| default.to_string(), str::to_string)
        };
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
                .unwrap_or(default)
        };

        let base_url = match (lookup("API_BASE_URL"), lookup("BACKEND_URL")) {
            (Some(url), _) if !url.trim().is_empty() => url.trim().to_string(),
            (_, Some(backend)) if !backend.trim().is_empty() => {
                api_url(backend.trim(), "api")
            }
            _ => DEFAULT_API_URL.to_string(),
        };

        Self {
            api: ApiConfig {
                base_url,
                timeout_ms: number(&lookup, "API_TIMEOUT", 10_000),
            },
            app: AppInfo {
                name: string("APP_NAME", "Healthcare Management System"),
                version: string("APP_VERSION", env!("CARGO_PKG_VERSION")),
            },
            features: Features {
                analytics: flag("ENABLE_ANALYTICS", true),
                chat: flag("ENABLE_CHAT", true),
                notifications: flag("ENABLE_NOTIFICATIONS", true),
                exercise_tracking: flag("ENABLE_EXERCISE_TRACKING", true),
            },
            development: Development {
                debug_mode: flag("DEBUG_MODE", true),
                log_level: string("LOG_LEVEL", "debug"),
            },
            auth: AuthConfig {
                token_storage_key: string(
                    "TOKEN_STORAGE_KEY",
                    "healthcare_auth_token",
                ),
                user_storage_key: string(
                    "USER_STORAGE_KEY",
                    "healthcare_user_data",
                ),
                session_timeout_ms: number(&lookup, "SESSION_TIMEOUT", 3_600_000),
            },
            pagination: Pagination {
                default_page_size: number(&lookup, "DEFAULT_PAGE_SIZE", 20),
                max_page_size: number(&lookup, "MAX_PAGE_SIZE", 100),
            },
            ui: UiTiming {
                analytics_refresh_interval_ms: number(
                    &lookup,
                    "ANALYTICS_REFRESH_INTERVAL",
                    30_000,
                ),
                notification_timeout_ms: number(
                    &lookup,
                    "NOTIFICATION_TIMEOUT",
                    5_000,
                ),
                max_notifications: number(&lookup, "MAX_NOTIFICATIONS", 50),
            },
        }
    }

    /// The console filter directive for this build. Outside debug mode
    /// nothing below `warn` is shown.
    pub fn log_filter(&self) -> String {
        let level = if self.development.debug_mode {
            self.development.log_level.as_str()
        } else {
            match self.development.log_level.as_str() {
                "error" => "error",
                _ => "warn",
            }
        };
        format!("error,ui={level}")
    }
}

fn number<'a, T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<&'a str>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Join a base url and an endpoint with exactly one `/` between them.
pub fn api_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn compile_time(key: &str) -> Option<&'static str> {
    match key {
        "API_BASE_URL" => option_env!("API_BASE_URL"),
        "BACKEND_URL" => option_env!("BACKEND_URL"),
        "API_TIMEOUT" => option_env!("API_TIMEOUT"),
        "APP_NAME" => option_env!("APP_NAME"),
        "APP_VERSION" => option_env!("APP_VERSION"),
        "ENABLE_ANALYTICS" => option_env!("ENABLE_ANALYTICS"),
        "ENABLE_CHAT" => option_env!("ENABLE_CHAT"),
        "ENABLE_NOTIFICATIONS" => option_env!("ENABLE_NOTIFICATIONS"),
        "ENABLE_EXERCISE_TRACKING" => option_env!("ENABLE_EXERCISE_TRACKING"),
        "DEBUG_MODE" => option_env!("DEBUG_MODE"),
        "LOG_LEVEL" => option_env!("LOG_LEVEL"),
        "TOKEN_STORAGE_KEY" => option_env!("TOKEN_STORAGE_KEY"),
        "USER_STORAGE_KEY" => option_env!("USER_STORAGE_KEY"),
        "SESSION_TIMEOUT" => option_env!("SESSION_TIMEOUT"),
        "DEFAULT_PAGE_SIZE" => option_env!("DEFAULT_PAGE_SIZE"),
        "MAX_PAGE_SIZE" => option_env!("MAX_PAGE_SIZE"),
        "ANALYTICS_REFRESH_INTERVAL" => option_env!("ANALYTICS_REFRESH_INTERVAL"),
        "NOTIFICATION_TIMEOUT" => option_env!("NOTIFICATION_TIMEOUT"),
        "MAX_NOTIFICATIONS" => option_env!("MAX_NOTIFICATIONS"),
        _ => None,
    }
}

/// The configuration this bundle was built with.
pub fn config() -> &'static AppConfig {
    static CONFIG: OnceLock<AppConfig> = OnceLock::new();
    CONFIG.get_or_init(|| AppConfig::from_lookup(compile_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with(pairs: &[(&'static str, &'static str)]) -> AppConfig {
        let map: HashMap<_, _> = pairs.iter().copied().collect();
        AppConfig::from_lookup(|key| map.get(key).copied())
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout_ms, 10_000);
        assert_eq!(config.auth.token_storage_key, "healthcare_auth_token");
        assert_eq!(config.auth.user_storage_key, "healthcare_user_data");
        assert_eq!(config.pagination.default_page_size, 20);
        assert_eq!(config.ui.notification_timeout_ms, 5_000);
        assert_eq!(config.ui.max_notifications, 50);
        assert!(config.features.chat && config.features.analytics);
        assert_eq!(config.log_filter(), "error,ui=debug");
    }

    #[test]
    fn flags_accept_true_and_one_only() {
        let config = with(&[
            ("ENABLE_CHAT", "0"),
            ("ENABLE_ANALYTICS", "yes"),
            ("ENABLE_NOTIFICATIONS", "1"),
            ("ENABLE_EXERCISE_TRACKING", "TRUE"),
        ]);
        assert!(!config.features.chat);
        assert!(!config.features.analytics);
        assert!(config.features.notifications);
        assert!(config.features.exercise_tracking);
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let config = with(&[("API_TIMEOUT", "soon"), ("MAX_PAGE_SIZE", "250")]);
        assert_eq!(config.api.timeout_ms, 10_000);
        assert_eq!(config.pagination.max_page_size, 250);
    }

    #[test]
    fn backend_url_implies_api_prefix() {
        let config = with(&[("BACKEND_URL", "http://localhost:8000/")]);
        assert_eq!(config.api.base_url, "http://localhost:8000/api");

        let config = with(&[
            ("BACKEND_URL", "http://localhost:8000"),
            ("API_BASE_URL", "https://clinic.example/api/v2"),
        ]);
        assert_eq!(config.api.base_url, "https://clinic.example/api/v2");
    }

    #[test]
    fn release_builds_cap_console_noise() {
        let config = with(&[("DEBUG_MODE", "false"), ("LOG_LEVEL", "trace")]);
        assert_eq!(config.log_filter(), "error,ui=warn");
    }

    #[test]
    fn api_url_joins_with_one_slash() {
        assert_eq!(api_url("http://h/api/", "/users/"), "http://h/api/users/");
        assert_eq!(api_url("http://h/api", "users/"), "http://h/api/users/");
    }
}
