use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Config {
    // Translation backend
    pub backend_base_url: String,

    // Locale resources
    pub locales_dir: String,
    pub language_file: String,

    // Staggered post-send refresh delays
    pub refresh_delay_short_ms: u64,
    pub refresh_delay_long_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Translation backend
            backend_base_url: std::env::var("BACKEND_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),

            // Locale resources
            locales_dir: std::env::var("LOCALES_DIR").unwrap_or_else(|_| "locales".to_string()),
            language_file: std::env::var("LANGUAGE_FILE")
                .unwrap_or_else(|_| "data/language".to_string()),

            // Refresh delays
            refresh_delay_short_ms: std::env::var("REFRESH_DELAY_SHORT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            refresh_delay_long_ms: std::env::var("REFRESH_DELAY_LONG_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(800),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "BACKEND_BASE_URL",
            "LOCALES_DIR",
            "LANGUAGE_FILE",
            "REFRESH_DELAY_SHORT_MS",
            "REFRESH_DELAY_LONG_MS",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_env_unset() {
        clear_env();

        let config = Config::from_env().expect("Should succeed");

        assert_eq!(config.backend_base_url, "http://localhost:8000");
        assert_eq!(config.locales_dir, "locales");
        assert_eq!(config.language_file, "data/language");
        assert_eq!(config.refresh_delay_short_ms, 100);
        assert_eq!(config.refresh_delay_long_ms, 800);
    }

    #[test]
    #[serial]
    fn test_env_overrides_win() {
        clear_env();
        std::env::set_var("BACKEND_BASE_URL", "http://translate.example.com");
        std::env::set_var("REFRESH_DELAY_LONG_MS", "1500");

        let config = Config::from_env().expect("Should succeed");

        assert_eq!(config.backend_base_url, "http://translate.example.com");
        assert_eq!(config.refresh_delay_long_ms, 1500);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparseable_delay_falls_back_to_default() {
        clear_env();
        std::env::set_var("REFRESH_DELAY_SHORT_MS", "soon");

        let config = Config::from_env().expect("Should succeed");
        assert_eq!(config.refresh_delay_short_ms, 100);

        clear_env();
    }
}
