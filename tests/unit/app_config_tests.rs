/*!
 * Tests for application configuration
 */

use shikshalok::app_config::{Config, LogLevel};

use crate::common;

#[test]
fn test_default_shouldUseDocumentedValues() {
    let config = Config::default();

    assert_eq!(config.source_language, "en-IN");
    assert_eq!(config.target_language, "hi-IN");
    assert_eq!(config.api.base_url, "https://api.sarvam.ai");
    assert_eq!(config.translation.inter_call_delay_ms, 200);
    assert_eq!(config.translation.max_block_chars, 2000);
    assert!(!config.translation.use_text_preprocessing);
    assert_eq!(config.speech.min_buffer_secs, 2.0);
    assert_eq!(config.speech.target_sample_rate, 16000);
    assert_eq!(config.speech.history_limit, 10);
    assert!(config.documents.docx);
    assert!(!config.documents.ocr);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.costs.stt_usd_per_second, 0.00001);
    assert_eq!(config.costs.translate_usd_per_char, 0.000005);
    assert_eq!(config.costs.tts_usd_per_char, 0.000003);
}

#[test]
fn test_validate_withNegativeCostRate_shouldFail() {
    let mut config = common::test_config();
    config.costs.translate_usd_per_char = -0.1;
    assert!(config.validate().is_err());

    let mut config = common::test_config();
    config.costs.stt_usd_per_second = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withoutApiKey_shouldFail() {
    let config = Config::default();
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("API subscription key"));
}

#[test]
fn test_validate_withApiKey_shouldSucceed() {
    assert!(common::test_config().validate().is_ok());
}

#[test]
fn test_validate_withUnsupportedTargetLanguage_shouldFail() {
    let mut config = common::test_config();
    config.target_language = "fr".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withAutoSource_shouldSucceed() {
    let mut config = common::test_config();
    config.source_language = "auto".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.source_code().unwrap(), "auto");
}

#[test]
fn test_validate_withInvalidBaseUrl_shouldFail() {
    let mut config = common::test_config();
    config.api.base_url = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroLimits_shouldFail() {
    let mut config = common::test_config();
    config.translation.max_block_chars = 0;
    assert!(config.validate().is_err());

    let mut config = common::test_config();
    config.speech.min_buffer_secs = 0.0;
    assert!(config.validate().is_err());

    let mut config = common::test_config();
    config.speech.history_limit = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_targetCode_shouldNormalizeShortCodes() {
    let mut config = common::test_config();
    config.target_language = "ta".to_string();
    assert_eq!(config.target_code().unwrap(), "ta-IN");
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.target_language, "hi-IN");
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "target_language": "bn-IN", "translation": { "max_block_chars": 500 }, "log_level": "debug" }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.target_language, "bn-IN");
    assert_eq!(config.source_language, "en-IN");
    assert_eq!(config.translation.max_block_chars, 500);
    assert_eq!(config.translation.model, "mayura:v1");
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_save_shouldRoundTripThroughLoad() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("saved.json");
    let mut config = common::test_config();
    config.speech.history_limit = 3;

    config.save(&path).unwrap();
    let loaded = Config::load_or_create(&path).unwrap();

    assert_eq!(loaded.api.api_key, "test-key");
    assert_eq!(loaded.speech.history_limit, 3);
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
