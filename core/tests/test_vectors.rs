//! Verify endpoint addressing and failure classification against JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector names its inputs and the expected output, so the tables double
//! as a readable catalogue of the address grammar and the status-substring
//! mapping.

use testhub_core::{classify, Endpoint, Operation, Resource};

fn parse_operation(s: &str) -> Operation {
    match s {
        "get" => Operation::Get,
        "add" => Operation::Add,
        "update" => Operation::Update,
        "close" => Operation::Close,
        "delete" => Operation::Delete,
        other => panic!("unknown operation: {other}"),
    }
}

fn parse_resource(s: &str) -> Resource {
    match s {
        "case" => Resource::Case,
        "project" => Resource::Project,
        "priority" => Resource::Priority,
        "run" => Resource::Run,
        "section" => Resource::Section,
        "user" => Resource::User,
        other => panic!("unknown resource: {other}"),
    }
}

#[test]
fn address_test_vectors() {
    let raw = include_str!("../../test-vectors/addresses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = parse_operation(case["operation"].as_str().unwrap());
        let resource = parse_resource(case["resource"].as_str().unwrap());

        let mut endpoint = if case["bulk"].as_bool().unwrap_or(false) {
            Endpoint::bulk(operation, resource)
        } else {
            Endpoint::single(operation, resource)
        };
        if let Some(id1) = case["id1"].as_u64() {
            endpoint = endpoint.id1(id1);
        }
        if let Some(id2) = case["id2"].as_u64() {
            endpoint = endpoint.id2(id2);
        }
        if let Some(id2_text) = case["id2_text"].as_str() {
            endpoint = endpoint.id2_text(id2_text);
        }
        if let Some(options) = case["options"].as_str() {
            endpoint = endpoint.options(options);
        }

        assert_eq!(
            endpoint.address(),
            case["expected"].as_str().unwrap(),
            "{name}"
        );
    }
}

#[test]
fn classification_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let message = case["message"].as_str().unwrap();
        let expected = case["expected_code"].as_u64().unwrap() as u16;

        assert_eq!(classify(message).code(), expected, "{name}: {message:?}");
    }
}
