//! Integration tests for the query envelope
//!
//! These tests verify the bytes a connection would write:
//! - START frames carry the token, length, and `[1, term, optargs]`
//! - Global options are encoded as terms
//! - Control queries carry only their type

use reql::{SerializeError, TermType, Value, r};
use reql_proto::{
    Durability, GlobalOptions, HEADER_LEN, ProtocolError, Query, ReadMode, decode_frame,
};
use serde_json::json;

fn sample_query() -> reql::Term {
    r::table("users")
        .unwrap()
        .filter(Value::object([("active", Value::from(true))]))
        .unwrap()
        .count()
        .unwrap()
}

#[test]
fn start_frame_round_trips() {
    let query = Query::start(42, sample_query(), GlobalOptions::new());
    let frame = query.encode().unwrap();

    let (token, payload) = decode_frame(&frame).unwrap();
    assert_eq!(token, 42);
    assert_eq!(
        payload,
        json!([1, [43, [[39, [[15, ["users"]], {"active": true}]]]], {}])
    );
}

#[test]
fn length_prefix_matches_payload() {
    let frame = Query::start(1, sample_query(), GlobalOptions::new())
        .encode()
        .unwrap();
    let len = u32::from_le_bytes([frame[8], frame[9], frame[10], frame[11]]) as usize;
    assert_eq!(frame.len(), HEADER_LEN + len);
}

#[test]
fn global_db_is_a_term() {
    let options = GlobalOptions::new()
        .with_db("blog")
        .with_read_mode(ReadMode::Majority)
        .with_durability(Durability::Hard)
        .with_array_limit(200_000);
    let query = Query::start(3, r::now().unwrap(), options);

    assert_eq!(
        query.to_json().unwrap(),
        json!([1, [103, []], {
            "db": [14, ["blog"]],
            "read_mode": "majority",
            "durability": "hard",
            "array_limit": 200000
        }])
    );
}

#[test]
fn extra_options_pass_through() {
    let options = GlobalOptions::new().with_extra("binary_format", json!("raw"));
    let query = Query::start(4, r::now().unwrap(), options);
    assert_eq!(
        query.to_json().unwrap(),
        json!([1, [103, []], {"binary_format": "raw"}])
    );
}

#[test]
fn extra_repeating_a_field_is_rejected() {
    let options = GlobalOptions::new()
        .with_noreply(true)
        .with_extra("noreply", json!(false));
    let query = Query::start(5, r::now().unwrap(), options);
    assert!(matches!(
        query.encode(),
        Err(ProtocolError::Reql(reql::ReqlError::DuplicateOptionKey(key))) if key == "noreply"
    ));
}

#[test]
fn stop_frame_has_no_term() {
    let frame = Query::stop(9).encode().unwrap();
    let (token, payload) = decode_frame(&frame).unwrap();
    assert_eq!(token, 9);
    assert_eq!(payload, json!([3]));
}

#[test]
fn same_query_encodes_identically() {
    let term = sample_query();
    let options = GlobalOptions::new().with_db("test").with_profile(true);
    let a = Query::start(11, term.clone(), options.clone()).encode().unwrap();
    let b = Query::start(11, term, options).encode().unwrap();
    assert_eq!(a, b);
}

fn nested_sum(links: usize) -> reql::Term {
    let mut t = r::expr(Value::object([("n", Value::from(0))])).unwrap();
    for _ in 0..links {
        t = t.apply(TermType::Add, [1]).unwrap();
    }
    t
}

#[test]
fn envelope_level_counts_toward_nesting() {
    // 127 levels on its own, 128 inside the START array
    let at_limit = nested_sum(63);
    assert!(at_limit.to_json().is_ok());
    let query = Query::start(6, at_limit, GlobalOptions::new());
    assert!(matches!(
        query.encode(),
        Err(ProtocolError::Serialize(SerializeError::TooDeep(_)))
    ));

    let frame = Query::start(7, nested_sum(62), GlobalOptions::new())
        .encode()
        .unwrap();
    let (token, payload) = decode_frame(&frame).unwrap();
    assert_eq!(token, 7);
    assert_eq!(payload[0], json!(1));
}
