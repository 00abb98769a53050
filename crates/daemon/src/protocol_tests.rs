// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol unit tests

use super::*;
use mcb_core::test_support::bot_record;
use mcb_core::ErrorKind;
use serde_json::json;

#[test]
fn stop_permanent_defaults_to_false() {
    let request: Request = decode(br#"{"type":"Stop","bot_id":"bot-1"}"#).unwrap();
    assert_eq!(
        request,
        Request::Stop {
            bot_id: BotId::new("bot-1"),
            permanent: false,
        }
    );
}

#[test]
fn command_params_default_to_null() {
    let request: Request =
        decode(br#"{"type":"Command","bot_id":"bot-1","name":"status"}"#).unwrap();
    let Request::Command { params, name, .. } = request else {
        panic!("expected Command, got {request:?}");
    };
    assert_eq!(name, "status");
    assert!(params.is_null());
}

#[test]
fn register_carries_full_record() {
    let request = Request::Register {
        record: bot_record("bot-1"),
    };
    let encoded = encode(&request).unwrap();
    let decoded: Request = decode(&encoded).unwrap();
    assert_eq!(request, decoded);
}

#[test]
fn result_response_uses_type_tag() {
    let response = Response::Result {
        result: OpResult::fail(ErrorKind::NotRunning, "Bot is not running"),
    };
    let value: Value = serde_json::from_slice(&encode(&response).unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "Result",
            "result": {
                "success": false,
                "message": "Bot is not running",
                "error": "not_running",
            }
        })
    );
}

#[test]
fn event_response_nests_bot_event_tag() {
    let response = Response::Event {
        event: BotEvent::GaveUp {
            bot_id: BotId::new("bot-1"),
            attempts: 3,
        },
    };
    let value: Value = serde_json::from_slice(&encode(&response).unwrap()).unwrap();
    assert_eq!(value["type"], "Event");
    assert_eq!(value["event"]["type"], "bot:gave_up");
    assert_eq!(value["event"]["attempts"], 3);
}

#[test]
fn unknown_request_type_is_rejected() {
    let err = decode::<Request>(br#"{"type":"Teleport"}"#).unwrap_err();
    assert!(matches!(err, ProtocolError::Json(_)));
}

#[test]
fn encode_returns_json_without_length_prefix() {
    let encoded = encode(&Response::Pong).unwrap();
    let json_str = std::str::from_utf8(&encoded).unwrap();
    assert!(json_str.starts_with('{'), "should be JSON object: {json_str}");
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original).await.unwrap();
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.unwrap();
    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.unwrap();

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_message_rejects_oversized_prefix() {
    let len = (MAX_MESSAGE_SIZE as u32) + 1;
    let mut cursor = std::io::Cursor::new(len.to_be_bytes().to_vec());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge { .. }));
}

#[tokio::test]
async fn read_message_on_empty_stream_is_connection_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn request_and_response_helpers_roundtrip() {
    let request = Request::Command {
        bot_id: BotId::new("bot-1"),
        name: "chat".to_string(),
        params: json!({"message": "hi"}),
    };
    let mut buffer = Vec::new();
    write_request(&mut buffer, &request, DEFAULT_TIMEOUT)
        .await
        .unwrap();
    let mut cursor = std::io::Cursor::new(buffer);
    let decoded = read_request(&mut cursor, DEFAULT_TIMEOUT).await.unwrap();
    assert_eq!(decoded, request);

    let response = Response::error("boom");
    let mut buffer = Vec::new();
    write_response(&mut buffer, &response, DEFAULT_TIMEOUT)
        .await
        .unwrap();
    let mut cursor = std::io::Cursor::new(buffer);
    assert_eq!(
        read_response(&mut cursor, DEFAULT_TIMEOUT).await.unwrap(),
        response
    );
}
