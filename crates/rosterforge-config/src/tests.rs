//! Tests for generator configuration and request parsing.

use super::*;
use rosterforge_core::MAX_LINEUP_COUNT;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        [roster]
        salary_ceiling = 35000
        min_hitters = 7

        [batch]
        attempt_multiplier = 5

        [termination]
        seconds_spent_limit = 2
        millis_spent_limit = 500
        node_count_limit = 100000
    "#;

    let config = GeneratorConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.roster.salary_ceiling, 35000.0);
    assert_eq!(config.roster.salary_floor, 45000.0);
    assert_eq!(config.roster.min_hitters, 7);
    assert_eq!(config.roster.quotas.get("OF"), Some(&3));
    assert_eq!(config.batch.attempt_multiplier, 5);
    assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
    assert_eq!(config.node_limit(), Some(100_000));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        roster:
          roster_size: 9
          quotas:
            P: 1
            C: 1
            1B: 1
            2B: 1
            3B: 1
            SS: 1
            OF: 3
        termination:
          seconds_spent_limit: 5
    "#;

    let config = GeneratorConfig::from_yaml_str(yaml).unwrap();
    let rules = config.roster_rules().unwrap();
    assert_eq!(rules.roster_size, 9);
    assert_eq!(rules.quota(Position::Pitcher), Some(1));
    assert_eq!(config.batch.attempt_multiplier, 3);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(5)));
}

#[test]
fn test_defaults_match_core_rules() {
    let config = GeneratorConfig::default();
    assert_eq!(config.roster_rules().unwrap(), RosterRules::default());
    assert_eq!(config.time_limit(), None);
    assert_eq!(config.node_limit(), None);
}

#[test]
fn test_builder() {
    let config = GeneratorConfig::new()
        .with_termination_seconds(60)
        .with_node_limit(10)
        .with_salary_range(30000.0, 40000.0)
        .with_attempt_multiplier(2);

    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert_eq!(config.node_limit(), Some(10));
    assert_eq!(config.roster.salary_floor, 30000.0);
    assert_eq!(config.batch.attempt_multiplier, 2);
}

#[test]
fn test_unknown_position_code() {
    let config = GeneratorConfig::from_toml_str(
        r#"
        [roster.quotas]
        DH = 1
    "#,
    )
    .unwrap();
    let err = config.roster_rules().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("DH")));
}

#[test]
fn test_inconsistent_rules() {
    let config = GeneratorConfig::new().with_salary_range(50000.0, 40000.0);
    assert!(matches!(
        config.roster_rules(),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_bad_toml() {
    assert!(matches!(
        GeneratorConfig::from_toml_str("[roster\nsalary_floor = 1"),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        GeneratorConfig::load("/nonexistent/rosterforge.toml"),
        Err(ConfigError::Io(_))
    ));
    let config = GeneratorConfig::load_or_default("/nonexistent/rosterforge.yaml").unwrap();
    assert_eq!(config.batch.attempt_multiplier, 3);
}

#[test]
fn test_load_or_default_surfaces_parse_errors() {
    let dir = tempfile::tempdir().unwrap();

    let broken = dir.path().join("rosterforge.toml");
    std::fs::write(&broken, "[roster\nsalary_floor = 1").unwrap();
    assert!(matches!(
        GeneratorConfig::load_or_default(&broken),
        Err(ConfigError::Toml(_))
    ));

    let valid = dir.path().join("valid.toml");
    std::fs::write(&valid, "[batch]\nattempt_multiplier = 5\n").unwrap();
    let config = GeneratorConfig::load_or_default(&valid).unwrap();
    assert_eq!(config.batch.attempt_multiplier, 5);

    let missing = dir.path().join("missing.toml");
    let config = GeneratorConfig::load_or_default(&missing).unwrap();
    assert_eq!(config.batch.attempt_multiplier, 3);
}

#[test]
fn test_request_defaults() {
    let request = GenerationRequest::from_params(Vec::<(&str, &str)>::new()).unwrap();
    assert_eq!(request, GenerationRequest::default());
    assert_eq!(request.count, 5);
    assert_eq!(request.stack, 0);
    assert_eq!(request.exposure, 100.0);

    let batch = request.to_batch_request(&GeneratorConfig::default()).unwrap();
    assert_eq!(batch.count, 5);
    assert_eq!(batch.configuration.max_exposure, Some(1.0));
    assert!(batch.configuration.stack.is_none());
    assert_eq!(batch.configuration.attempt_multiplier, 3);
}

#[test]
fn test_request_blank_values_keep_defaults() {
    let request =
        GenerationRequest::from_params([("count", " "), ("team", ""), ("stack", "")]).unwrap();
    assert_eq!(request.count, 5);
    assert_eq!(request.team, None);
}

#[test]
fn test_request_parse_errors() {
    let err = GenerationRequest::from_params([("count", "five")]).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Parse { ref param, ref value } if param == "count" && value == "five"
    ));
    assert_eq!(
        err.to_string(),
        "Invalid value 'five' for parameter 'count'"
    );

    assert!(matches!(
        GenerationRequest::from_params([("stack", "-1")]),
        Err(ConfigError::Parse { .. })
    ));
    assert!(matches!(
        GenerationRequest::from_params([("count", "0")]),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        GenerationRequest::from_params([("exposure", "150")]),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_request_count_is_bounded() {
    let at_max = MAX_LINEUP_COUNT.to_string();
    assert!(GenerationRequest::from_params([("count", at_max.as_str())]).is_ok());

    let above = (MAX_LINEUP_COUNT + 1).to_string();
    assert!(matches!(
        GenerationRequest::from_params([("count", above.as_str())]),
        Err(ConfigError::Invalid(ref msg)) if msg.contains("at most")
    ));

    let huge = (1usize << 60).to_string();
    assert!(matches!(
        GenerationRequest::from_params([("count", huge.as_str())]),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_request_zero_exposure_is_uncapped() {
    let request = GenerationRequest::from_params([("exposure", "0")]).unwrap();
    let batch = request.to_batch_request(&GeneratorConfig::default()).unwrap();
    assert_eq!(batch.configuration.max_exposure, None);
}

#[test]
fn test_request_options() {
    let request = GenerationRequest::from_params([
        ("team", " lad "),
        ("stack", "3"),
        ("lock", "Shohei Ohtani"),
        ("exclude", "A, B"),
        ("exclude", "C"),
        ("unknown", "ignored"),
    ])
    .unwrap();
    assert_eq!(request.exclude, vec!["A", "B", "C"]);

    let config = GeneratorConfig::new().with_attempt_multiplier(4);
    let batch = request.to_batch_request(&config).unwrap();
    let stack = batch.configuration.active_stack().unwrap();
    assert_eq!(stack.team(), "LAD");
    assert_eq!(stack.size(), 3);
    assert_eq!(batch.configuration.locked.as_deref(), Some("Shohei Ohtani"));
    assert!(batch.configuration.excluded.contains("B"));
    assert_eq!(batch.configuration.attempt_multiplier, 4);
}

#[test]
fn test_request_rejects_oversized_stack() {
    let request = GenerationRequest::from_params([("team", "LAD"), ("stack", "11")]).unwrap();
    assert!(matches!(
        request.to_batch_request(&GeneratorConfig::default()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_config_error_converts_to_lineup_error() {
    let err: LineupError = ConfigError::Invalid("bad".to_string()).into();
    assert_eq!(
        err,
        LineupError::Config("Invalid configuration: bad".to_string())
    );
}
