use svcamount_resolver::{ResolveError, Resolver, resolve};
use svcamount_types::{CredentialSet, ServiceDescriptor};

fn creds(pairs: &[(&str, &str)]) -> CredentialSet {
    pairs.iter().copied().collect()
}

/// Every supported type with a credential set that satisfies it.
fn supported_cases() -> Vec<(&'static str, &'static str, CredentialSet)> {
    vec![
        ("spark", "Yarn_Queue", creds(&[("Yarn_Queue", "root.engineering")])),
        ("mapreduce", "Yarn_Queue", creds(&[("Yarn_Queue", "root.batch")])),
        ("hdfs", "HDFS_Path", creds(&[("HDFS_Path", "/user/data")])),
        ("hive", "Hive_Database", creds(&[("Hive_Database", "warehouse")])),
        ("hbase", "HBase_NameSpace", creds(&[("HBase_NameSpace", "ns1")])),
        ("kafka", "topic", creds(&[("topic", "events")])),
        ("mongodb", "name", creds(&[("name", "salesdb")])),
        ("greenplum", "name", creds(&[("name", "gpdb")])),
    ]
}

#[test]
fn documented_examples_resolve_exactly() {
    assert_eq!(
        resolve("sparkjob", "spark", &creds(&[("Yarn_Queue", "root.engineering")])).unwrap(),
        "/spark/engineering?service=sparkjob"
    );
    assert_eq!(resolve("mykafka", "kafka", &creds(&[("topic", "events")])).unwrap(), "/kafka/events?service=mykafka");
    assert_eq!(resolve("mymongo", "mongodb", &creds(&[("name", "salesdb")])).unwrap(), "/mymongo/salesdb");
    assert_eq!(
        resolve("hdfsdata", "hdfs", &creds(&[("HDFS_Path", "/user/data")])).unwrap(),
        "/hdfs?service=hdfsdata&path=/user/data"
    );
}

#[test]
fn padded_service_type_is_trimmed_in_the_uri() {
    assert_eq!(resolve("mykafka", " kafka", &creds(&[("topic", "events")])).unwrap(), "/kafka/events?service=mykafka");
    assert_eq!(
        resolve("hdfsdata", "HDFS\t", &creds(&[("HDFS_Path", "/user/data")])).unwrap(),
        "/hdfs?service=hdfsdata&path=/user/data"
    );
}

#[test]
fn blank_credential_values_are_invalid() {
    for (service_type, field, _) in supported_cases() {
        let err = resolve("svc", service_type, &creds(&[(field, "")])).expect_err(service_type);
        assert_eq!(err.reason(), "InvalidCredential", "{service_type}");
        assert_eq!(err.field(), Some(field), "{service_type}");
    }
}

#[test]
fn unknown_types_are_unsupported() {
    for service_type in ["neo4j", "rabbitmq", "etcd", "yarn", "database", "", "spark2"] {
        let err = resolve("svc", service_type, &creds(&[("name", "x"), ("topic", "y")])).expect_err(service_type);
        assert!(
            matches!(err, ResolveError::UnsupportedServiceType { .. }),
            "{service_type}: unexpected {err:?}"
        );
    }
}

#[test]
fn missing_required_field_fails_without_partial_uri() {
    for (service_type, field, _) in supported_cases() {
        let unrelated = creds(&[("unrelated", "value")]);
        let err = resolve("svc", service_type, &unrelated).expect_err(service_type);
        assert_eq!(err.reason(), "MissingCredential", "{service_type}");
        assert_eq!(err.field(), Some(field), "{service_type}");
    }
}

#[test]
fn uris_start_with_slash_and_carry_lowercased_service_name() {
    for (service_type, _, credentials) in supported_cases() {
        let uri = resolve("Mixed Case", service_type, &credentials).expect(service_type);
        assert!(uri.starts_with('/'), "{uri}");
        assert!(!uri.contains(char::is_whitespace), "{uri}");
        if let Some((_, query)) = uri.split_once('?') {
            assert!(query.starts_with("service=mixed%20case"), "{uri}");
        }
    }
}

#[test]
fn resolution_is_idempotent() {
    let resolver = Resolver::default();
    for (service_type, _, credentials) in supported_cases() {
        let descriptor = ServiceDescriptor::new("svc", service_type);
        let first = resolver.resolve(&descriptor, &credentials);
        let second = resolver.resolve(&descriptor, &credentials);
        assert_eq!(first, second);
    }
}

#[test]
fn dispatch_ignores_type_case_and_emits_lowercase_type() {
    let uri = resolve("KafkaProd", "KAFKA", &creds(&[("topic", "t")])).unwrap();
    assert_eq!(uri, "/kafka/t?service=kafkaprod");
}

#[test]
fn concurrent_resolution_shares_nothing() {
    let resolver = Resolver::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                scope.spawn(move || {
                    let topic = format!("topic{i}");
                    let credentials = creds(&[("topic", topic.as_str())]);
                    resolver.resolve(&ServiceDescriptor::new("k", "kafka"), &credentials)
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap().unwrap(), format!("/kafka/topic{i}?service=k"));
        }
    });
}
