//! Content identifier behavior for in-cluster sources, exercised through the
//! public API.

use std::collections::BTreeMap;

use k8s_openapi::ByteString;
use sha2::{Digest, Sha256};

use config_sync_controller::source::{config_map_revision, secret_revision};

fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    format!("{:x}", hasher.finalize())
}

#[test]
fn config_map_identifier_matches_documented_layout() {
    // {"app.yaml": "a: 1"} hashes as "app.yaml\n" + "a: 1" + "\n"
    let data: BTreeMap<String, String> =
        [("app.yaml".to_string(), "a: 1".to_string())].into_iter().collect();

    assert_eq!(config_map_revision(&data), sha256_hex(b"app.yaml\na: 1\n"));
}

#[test]
fn secret_identifier_matches_documented_layout() {
    // {"key.txt": [0,1,2]} hashes as "key.txt\n3\n000102\n"
    let data: BTreeMap<String, ByteString> =
        [("key.txt".to_string(), ByteString(vec![0, 1, 2]))].into_iter().collect();

    assert_eq!(secret_revision(&data), sha256_hex(b"key.txt\n3\n000102\n"));
}

#[test]
fn config_map_identifier_is_permutation_invariant() {
    let entries = [
        ("deployment.yaml", "replicas: 3"),
        ("service.yaml", "port: 80"),
        ("ingress.yaml", "host: example.io"),
    ];

    let forward: BTreeMap<String, String> = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let reversed: BTreeMap<String, String> = entries
        .iter()
        .rev()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    assert_eq!(config_map_revision(&forward), config_map_revision(&reversed));
}

#[test]
fn secret_identifier_is_permutation_invariant() {
    let entries: [(&str, &[u8]); 3] = [
        ("tls.crt", b"certificate"),
        ("tls.key", b"private key"),
        ("ca.crt", b"authority"),
    ];

    let forward: BTreeMap<String, ByteString> = entries
        .iter()
        .map(|(k, v)| (k.to_string(), ByteString(v.to_vec())))
        .collect();
    let reversed: BTreeMap<String, ByteString> = entries
        .iter()
        .rev()
        .map(|(k, v)| (k.to_string(), ByteString(v.to_vec())))
        .collect();

    assert_eq!(secret_revision(&forward), secret_revision(&reversed));
}

#[test]
fn identifier_changes_when_any_entry_changes() {
    let base: BTreeMap<String, String> = [
        ("a.yaml".to_string(), "1".to_string()),
        ("b.yaml".to_string(), "2".to_string()),
    ]
    .into_iter()
    .collect();

    let mut value_changed = base.clone();
    value_changed.insert("b.yaml".to_string(), "3".to_string());

    let mut key_added = base.clone();
    key_added.insert("c.yaml".to_string(), "3".to_string());

    let mut key_removed = base.clone();
    key_removed.remove("b.yaml");

    let original = config_map_revision(&base);
    assert_ne!(original, config_map_revision(&value_changed));
    assert_ne!(original, config_map_revision(&key_added));
    assert_ne!(original, config_map_revision(&key_removed));
}

#[test]
fn config_and_secret_identifiers_use_distinct_encodings() {
    // the same logical entry must not collide across source kinds
    let cm: BTreeMap<String, String> = [("key".to_string(), "abc".to_string())].into_iter().collect();
    let secret: BTreeMap<String, ByteString> =
        [("key".to_string(), ByteString(b"abc".to_vec()))].into_iter().collect();

    assert_ne!(config_map_revision(&cm), secret_revision(&secret));
}
