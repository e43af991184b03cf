#[cfg(test)]
mod tests {
    use std::io::Write;
    use secrecy::ExposeSecret;
    use tempfile::NamedTempFile;
    use crate::config::models::BlockPulseConfig;
    use crate::config::parser::{load_api_key, load_config, load_or_default, ConfigError};

    // Helper function to create a temporary file with content
    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_valid_configuration() {
        let config_yaml = r#"
        provider:
          name: ethereum
          rpc_url: https://eth-mainnet.g.alchemy.com/v2
          api_key_env: MY_PROVIDER_KEY

        token:
          address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
          symbol: USDC
          decimals: 6

        window:
          block_count: 20

        refresh:
          interval_secs: 6

        metrics:
          enabled: true
          port: 9191
        "#;

        let temp_file = create_temp_file(config_yaml);
        let config = load_config(temp_file.path()).expect("Failed to load valid config");

        assert_eq!(config.provider.name, "ethereum");
        assert_eq!(config.provider.rpc_url, "https://eth-mainnet.g.alchemy.com/v2");
        assert_eq!(config.provider.api_key_env, "MY_PROVIDER_KEY");

        assert_eq!(config.token.symbol, "USDC");
        assert_eq!(config.token.decimals, 6);
        assert!(config.token.parsed_address().is_ok());

        assert_eq!(config.window.block_count, 20);
        assert_eq!(config.refresh.interval_secs, 6);

        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.port, 9191);
    }

    #[test]
    fn test_minimal_configuration_uses_defaults() {
        let config_yaml = r#"
        refresh:
          interval_secs: 30
        "#;

        let temp_file = create_temp_file(config_yaml);
        let config = load_config(temp_file.path()).expect("Failed to load valid config");

        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.window.block_count, 10);
        assert_eq!(config.token.symbol, "USDT");
        assert_eq!(config.token.address, "0xdAC17F958D2ee523a2206206994597C13D831ec7");
        assert_eq!(config.token.decimals, 6);
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.port, 9090);
    }

    #[test]
    fn test_invalid_token_address() {
        let config_yaml = r#"
        token:
          address: "0xnot-an-address"
        "#;

        let temp_file = create_temp_file(config_yaml);
        let result = load_config(temp_file.path());

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_rpc_url() {
        let config_yaml = r#"
        provider:
          rpc_url: "not a url"
        "#;

        let temp_file = create_temp_file(config_yaml);
        let result = load_config(temp_file.path());

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_window_out_of_range() {
        for block_count in ["0", "129"] {
            let config_yaml = format!("window:\n  block_count: {block_count}\n");
            let temp_file = create_temp_file(&config_yaml);
            let result = load_config(temp_file.path());

            assert!(
                matches!(result, Err(ConfigError::ValidationError(_))),
                "block_count {block_count} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let temp_file = create_temp_file("refresh:\n  interval_secs: 0\n");
        let result = load_config(temp_file.path());

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let temp_file = create_temp_file("window: [unclosed");
        let result = load_config(temp_file.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/blockpulse/config.yaml");
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let result = load_or_default(Some(std::path::Path::new("/nonexistent/config.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_api_key_loaded_from_configured_env_var() {
        let mut config = BlockPulseConfig::default();
        config.provider.api_key_env = "BLOCKPULSE_TEST_API_KEY_PRESENT".to_string();

        std::env::set_var("BLOCKPULSE_TEST_API_KEY_PRESENT", " abc123 ");
        let key = load_api_key(&config).expect("key should be loaded");
        std::env::remove_var("BLOCKPULSE_TEST_API_KEY_PRESENT");

        assert_eq!(key.expose_secret(), "abc123");
    }

    #[test]
    fn test_missing_or_blank_api_key() {
        let mut config = BlockPulseConfig::default();
        config.provider.api_key_env = "BLOCKPULSE_TEST_API_KEY_ABSENT".to_string();
        std::env::remove_var("BLOCKPULSE_TEST_API_KEY_ABSENT");
        assert!(load_api_key(&config).is_none());

        config.provider.api_key_env = "BLOCKPULSE_TEST_API_KEY_BLANK".to_string();
        std::env::set_var("BLOCKPULSE_TEST_API_KEY_BLANK", "   ");
        assert!(load_api_key(&config).is_none());
        std::env::remove_var("BLOCKPULSE_TEST_API_KEY_BLANK");
    }
}
