use rstest::rstest;
use serde_json::json;

use super::*;

const TRACE_ID: &str = "6f1c2a4e-0d3b-4f7a-9c55-1b2e3d4f5a6b";

#[rstest]
#[case(Error::invalid_request("x"), "invalid_request")]
#[case(Error::forbidden("x"), "forbidden")]
#[case(Error::not_found("x"), "not_found")]
#[case(Error::conflict("x"), "conflict")]
#[case(Error::not_configured("x"), "not_configured")]
#[case(Error::upstream("x"), "upstream_failure")]
#[case(Error::parse_failure("x"), "parse_failure")]
#[case(Error::filesystem("x"), "filesystem_failure")]
#[case(Error::internal("x"), "internal_error")]
fn shorthands_serialise_their_code(#[case] error: Error, #[case] wire: &str) {
    assert_eq!(serde_json::to_value(error.code()).expect("code"), wire);
}

#[rstest]
#[case("")]
#[case("  \n")]
fn blank_messages_fall_back(#[case] message: &str) {
    assert_eq!(Error::upstream(message).message(), "Unknown error occurred.");
}

#[rstest]
#[tokio::test]
async fn trace_id_is_captured_only_inside_a_scope() {
    assert_eq!(Error::internal("boom").trace_id(), None);

    let id: TraceId = TRACE_ID.parse().expect("uuid");
    let error = id.scope(async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn blank_trace_ids_do_not_override() {
    let error = Error::conflict("exists").with_trace_id("abc").with_trace_id(" ");
    assert_eq!(error.trace_id(), Some("abc"));
}

#[rstest]
fn redaction_keeps_code_and_trace_id_only() {
    let error = Error::internal("pool exhausted on db-1")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "host": "db-1" }));
    let redacted = error.redacted();
    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
    assert_eq!(redacted.details(), None);
}

#[rstest]
fn wire_form_is_camel_case_without_empty_fields() {
    let plain = serde_json::to_value(Error::invalid_request("bad")).expect("json");
    assert_eq!(plain, json!({ "code": "invalid_request", "message": "bad" }));

    let full = Error::invalid_request("bad")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "field": "slug" }));
    let value = serde_json::to_value(&full).expect("json");
    assert_eq!(value["traceId"], TRACE_ID);
    let back: Error = serde_json::from_value(value).expect("round trip");
    assert_eq!(back, full);
}
