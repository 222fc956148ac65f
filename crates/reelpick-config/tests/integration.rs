use std::path::PathBuf;

use reelpick_config::{AppConfig, ConfigError};

#[test]
fn placeholder_key_leaves_browsing_disabled() -> anyhow::Result<()> {
    let config = AppConfig::from_lookup(|name| match name {
        "RAWG_API_KEY" => Some("your_api_key_here".to_string()),
        "REELPICK_DATA_DIR" => Some("/var/lib/reelpick".to_string()),
        "REELPICK_LOG_FORMAT" => Some("json".to_string()),
        _ => None,
    })?;

    assert!(!config.api_key_available());
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/reelpick"));

    let rendered = serde_json::to_value(&config)?;
    assert!(rendered.get("api_key").is_none());
    assert_eq!(rendered["log_format"], "json");
    Ok(())
}

#[test]
fn custom_endpoint_and_page_size_are_honoured() -> anyhow::Result<()> {
    let config = AppConfig::from_lookup(|name| match name {
        "RAWG_API_KEY" => Some("real-key".to_string()),
        "REELPICK_API_URL" => Some("http://127.0.0.1:8080/api".to_string()),
        "REELPICK_PAGE_SIZE" => Some("40".to_string()),
        "REELPICK_HTTP_TIMEOUT_SECS" => Some("3".to_string()),
        _ => None,
    })?;

    assert!(config.api_key_available());
    assert_eq!(config.api_url.as_str(), "http://127.0.0.1:8080/api");
    assert_eq!(config.page_size, 40);
    assert_eq!(config.http_timeout.as_secs(), 3);
    Ok(())
}

#[test]
fn blank_values_fall_back_to_defaults() -> anyhow::Result<()> {
    let config = AppConfig::from_lookup(|name| match name {
        "REELPICK_PAGE_SIZE" | "RAWG_API_KEY" => Some("  ".to_string()),
        _ => None,
    })?;
    assert_eq!(config.page_size, 20);
    assert_eq!(config.api_key, None);
    Ok(())
}

#[test]
fn malformed_timeout_names_the_variable() {
    let err = AppConfig::from_lookup(|name| {
        (name == "REELPICK_HTTP_TIMEOUT_SECS").then(|| "soon".to_string())
    })
    .expect_err("timeout should be rejected");
    assert_eq!(
        err,
        ConfigError::InvalidField {
            field: "REELPICK_HTTP_TIMEOUT_SECS",
            value: Some("soon".to_string()),
            reason: "not_a_number",
        }
    );
}
