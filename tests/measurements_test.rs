// ABOUTME: Unit tests for measurement response decoding
// ABOUTME: Validates server-order decode, typed fetch failures, and malformed groups
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use withings_metrics::errors::Error;
use withings_metrics::measurements::{decode_measurements_response, MeasurementsResponse};
use withings_metrics::models::MeasureType;

fn parse(raw: &str) -> MeasurementsResponse {
    serde_json::from_str(raw).unwrap()
}

#[test]
fn test_two_groups_decode_in_server_order() {
    let response = parse(
        r#"{
            "status": 0,
            "body": {
                "measuregrps": [
                    {
                        "grpid": 101,
                        "attrib": 0,
                        "date": 1700000000,
                        "category": 1,
                        "measures": [
                            {"value": 805, "type": 1, "unit": -1},
                            {"value": 255, "type": 6, "unit": -1}
                        ]
                    },
                    {
                        "grpid": 102,
                        "attrib": 0,
                        "date": 1700086400,
                        "category": 1,
                        "measures": [
                            {"value": 790, "type": 1, "unit": -1}
                        ]
                    }
                ]
            }
        }"#,
    );

    let groups = decode_measurements_response(response).unwrap();
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0].group_id(), 101);
    assert_eq!(groups[0].weight(), Some(80.5));
    assert_eq!(groups[0].fat_ratio(), Some(25.5));

    assert_eq!(groups[1].group_id(), 102);
    assert_eq!(groups[1].weight(), Some(79.0));
    assert_eq!(groups[1].fat_ratio(), None);
}

#[test]
fn test_non_zero_status_is_a_typed_failure() {
    let response = parse(r#"{"status": 401, "error": "invalid token"}"#);

    let err = decode_measurements_response(response).unwrap_err();
    match err {
        Error::MeasurementFetchFailed { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid token");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_success_without_body_is_a_typed_failure() {
    let response = parse(r#"{"status": 0}"#);

    let err = decode_measurements_response(response).unwrap_err();
    assert!(matches!(err, Error::MeasurementFetchFailed { status: 0, .. }));
}

#[test]
fn test_group_without_measures_aborts_the_decode() {
    let response = parse(
        r#"{
            "status": 0,
            "body": {
                "measuregrps": [
                    {"grpid": 7, "attrib": 0, "date": 1700000000, "category": 1, "measures": []}
                ]
            }
        }"#,
    );

    let err = decode_measurements_response(response).unwrap_err();
    assert!(matches!(err, Error::MalformedMeasureGroup { group_id: 7 }));
}

#[test]
fn test_unknown_measure_types_survive_the_decode() {
    let response = parse(
        r#"{
            "status": 0,
            "body": {
                "measuregrps": [
                    {
                        "grpid": 103,
                        "attrib": 2,
                        "date": 1700000000,
                        "category": 1,
                        "measures": [
                            {"value": 123, "type": 999, "unit": 0},
                            {"value": 805, "type": 1, "unit": -1}
                        ]
                    }
                ]
            }
        }"#,
    );

    let groups = decode_measurements_response(response).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].measures()[0].measure_type(), MeasureType::Unknown(999));
    assert_eq!(groups[0].measures()[0].value(), 123.0);
    assert_eq!(groups[0].weight(), Some(80.5));
}
