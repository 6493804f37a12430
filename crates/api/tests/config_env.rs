use std::time::Duration;

use svcamount_api::config::{BASE_URL_ENV, BIND_ENV, HIVE_FORMAT_ENV, TIMEOUT_ENV};
use svcamount_api::{AmountConfig, ConfigError};
use svcamount_registry::SERVICES_ENV;
use svcamount_resolver::HiveDatabaseFormat;

const ALL_VARS: [&str; 5] = [BASE_URL_ENV, HIVE_FORMAT_ENV, TIMEOUT_ENV, BIND_ENV, SERVICES_ENV];

fn with_env<F: FnOnce()>(values: &[(&str, &str)], f: F) {
    let vars: Vec<(&str, Option<&str>)> = ALL_VARS
        .iter()
        .map(|name| (*name, values.iter().find(|(key, _)| key == name).map(|(_, value)| *value)))
        .collect();
    temp_env::with_vars(vars, f);
}

#[test]
fn missing_base_url_fails_fast() {
    with_env(&[], || {
        let err = AmountConfig::from_env().expect_err("base url required");
        assert!(matches!(err, ConfigError::MissingVar { name } if name == BASE_URL_ENV));
        assert_eq!(err.to_string(), "HADOOP_AMOUNT_BASEURL must be specified");
    });
}

#[test]
fn blank_base_url_counts_as_missing() {
    with_env(&[(BASE_URL_ENV, "  ")], || {
        assert!(matches!(AmountConfig::from_env(), Err(ConfigError::MissingVar { .. })));
    });
}

#[test]
fn reads_all_settings() {
    with_env(
        &[
            (BASE_URL_ENV, "http://amount.example.com/"),
            (HIVE_FORMAT_ENV, "composite"),
            (TIMEOUT_ENV, "5"),
            (BIND_ENV, "127.0.0.1:9090"),
            (SERVICES_ENV, "hadoop:kafka"),
        ],
        || {
            let config = AmountConfig::from_env().expect("valid configuration");
            assert_eq!(config.base_url, "https://amount.example.com");
            assert_eq!(config.hive_format, HiveDatabaseFormat::Composite);
            assert_eq!(config.request_timeout, Duration::from_secs(5));
            assert_eq!(config.bind_address.to_string(), "127.0.0.1:9090");
            assert_eq!(config.services, "hadoop:kafka");
        },
    );
}

#[test]
fn rejects_unparsable_optional_values() {
    for (name, value) in [(HIVE_FORMAT_ENV, "split"), (TIMEOUT_ENV, "soon"), (TIMEOUT_ENV, "0"), (BIND_ENV, "nowhere")] {
        with_env(&[(BASE_URL_ENV, "amount.example.com"), (name, value)], || {
            let err = AmountConfig::from_env().expect_err(value);
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{name}={value}: {err:?}");
        });
    }
}
