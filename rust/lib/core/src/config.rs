use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the console core.
///
/// The embedding application parses these from command-line arguments,
/// then lets `FMCONSOLE_*` environment variables override them.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL, e.g. `https://fm.example.com/api`.
    pub api_base: String,

    /// Fixed per-request timeout.
    pub request_timeout: Duration,

    /// Total attempts per request, first try included.
    pub max_attempts: u32,

    /// First retry delay; doubles on every further retry.
    pub backoff_base: Duration,

    /// Upper bound for a single retry delay.
    pub backoff_max: Duration,

    /// Session storage file. `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,

    /// Path of the fixed, non-closable home tab.
    pub home_path: String,

    /// Fail route generation when a held permission has no route or page,
    /// instead of skipping it with a warning.
    pub strict_routes: bool,

    /// HMAC secret for verifying credentials locally. Without it the
    /// credential is decoded but not verified.
    pub jwt_secret: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8080".to_string(),
            request_timeout: Duration::from_secs(10),
            max_attempts: 3,
            backoff_base: Duration::from_millis(300),
            backoff_max: Duration::from_secs(5),
            session_file: None,
            home_path: "/dashboard".to_string(),
            strict_routes: false,
            jwt_secret: None,
        }
    }
}

impl ConsoleConfig {
    /// Parse configuration from command-line arguments.
    ///
    /// Supported flags:
    /// - `--api-base=URL`
    /// - `--timeout-ms=N`
    /// - `--max-attempts=N`
    /// - `--backoff-ms=N`
    /// - `--backoff-max-ms=N`
    /// - `--session-file=PATH`
    /// - `--home=PATH`
    /// - `--strict-routes`
    /// - `--jwt-secret=SECRET`
    ///
    /// Unknown flags are ignored; malformed numbers keep the default.
    pub fn from_args(args: &[String]) -> Self {
        let mut config = ConsoleConfig::default();
        for arg in args {
            if arg == "--strict-routes" {
                config.strict_routes = true;
            } else if let Some((key, val)) = arg.strip_prefix("--").and_then(|a| a.split_once('=')) {
                config.apply(key, val);
            }
        }
        config
    }

    /// Override fields from `FMCONSOLE_*` environment variables.
    pub fn with_env(mut self) -> Self {
        self.apply_vars(std::env::vars());
        self
    }

    fn apply_vars(&mut self, vars: impl Iterator<Item = (String, String)>) {
        for (name, val) in vars {
            let Some(key) = name.strip_prefix("FMCONSOLE_") else {
                continue;
            };
            let key = key.to_ascii_lowercase().replace('_', "-");
            if key == "strict-routes" {
                self.strict_routes = matches!(val.as_str(), "1" | "true" | "yes");
            } else {
                self.apply(&key, &val);
            }
        }
    }

    fn apply(&mut self, key: &str, val: &str) {
        match key {
            "api-base" => self.api_base = val.trim_end_matches('/').to_string(),
            "timeout-ms" => set_millis(&mut self.request_timeout, key, val),
            "max-attempts" => match val.parse::<u32>() {
                Ok(n) if n > 0 => self.max_attempts = n,
                _ => tracing::warn!(value = val, "ignoring invalid --max-attempts"),
            },
            "backoff-ms" => set_millis(&mut self.backoff_base, key, val),
            "backoff-max-ms" => set_millis(&mut self.backoff_max, key, val),
            "session-file" => self.session_file = Some(PathBuf::from(val)),
            "home" => self.home_path = val.to_string(),
            "jwt-secret" => self.jwt_secret = Some(val.to_string()),
            _ => {}
        }
    }
}

fn set_millis(field: &mut Duration, key: &str, val: &str) {
    match val.parse::<u64>() {
        Ok(ms) => *field = Duration::from_millis(ms),
        Err(_) => tracing::warn!(flag = key, value = val, "ignoring invalid duration"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        let args = vec![
            "--api-base=https://fm.example.com/api/".to_string(),
            "--timeout-ms=2500".to_string(),
            "--max-attempts=5".to_string(),
            "--session-file=/tmp/fm/session.json".to_string(),
            "--strict-routes".to_string(),
        ];
        let config = ConsoleConfig::from_args(&args);
        assert_eq!(config.api_base, "https://fm.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/fm/session.json")));
        assert!(config.strict_routes);
        assert_eq!(config.home_path, "/dashboard");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let args = vec![
            "--timeout-ms=soon".to_string(),
            "--max-attempts=0".to_string(),
            "--unknown=1".to_string(),
        ];
        let config = ConsoleConfig::from_args(&args);
        let defaults = ConsoleConfig::default();
        assert_eq!(config.request_timeout, defaults.request_timeout);
        assert_eq!(config.max_attempts, defaults.max_attempts);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConsoleConfig::default();
        config.apply_vars(
            vec![
                ("FMCONSOLE_API_BASE".to_string(), "http://backend:9000".to_string()),
                ("FMCONSOLE_BACKOFF_MAX_MS".to_string(), "800".to_string()),
                ("FMCONSOLE_STRICT_ROUTES".to_string(), "true".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
            ]
            .into_iter(),
        );
        assert_eq!(config.api_base, "http://backend:9000");
        assert_eq!(config.backoff_max, Duration::from_millis(800));
        assert!(config.strict_routes);
    }
}
