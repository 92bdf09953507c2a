//! Shared builders for session tests.

use mockable::DefaultClock;
use rstest::fixture;

use crate::session::domain::{
    AiMessage, ExecutionMetadata, RichMessage, Sender, SessionId, SessionMessage, SystemMessage,
    SystemMessageKind,
};

#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
pub fn session_id() -> SessionId {
    SessionId::new("s1")
}

/// A user text message with a fixed timestamp.
pub fn text_at(text: &str, timestamp: i64) -> SessionMessage {
    SessionMessage::builder(Sender::User)
        .with_text(text)
        .with_timestamp(timestamp)
        .build(&DefaultClock)
        .expect("valid message")
}

/// An AI reply with a fixed timestamp.
pub fn ai_reply_at(raw_json: &str, timestamp: i64) -> SessionMessage {
    SessionMessage::builder(Sender::Ai)
        .with_ai_json(raw_json)
        .expect("valid payload")
        .with_timestamp(timestamp)
        .build(&DefaultClock)
        .expect("valid message")
}

/// One message of every kind, in conversation order.
pub fn every_kind() -> Vec<SessionMessage> {
    let clock = DefaultClock;
    let metadata = ExecutionMetadata::new("rule-1", 1_700_000_000_000);
    vec![
        SessionMessage::user_chat(RichMessage::new("How did I sleep?"), &clock),
        SessionMessage::ai_reply(r#"{"preText":"Let me check."}"#, &clock).expect("valid reply"),
        SessionMessage::system(
            SystemMessage::new(SystemMessageKind::DataQuery, "1 query executed"),
            &clock,
        ),
        SessionMessage::module_response("Yes", &clock),
        SessionMessage::post_action_notice("Entry added", &clock),
        SessionMessage::automation_prompt(RichMessage::new("Daily review"), metadata.clone(), &clock),
        SessionMessage::automation_execution(r#"{"preText":"Done"}"#, metadata, &clock)
            .expect("valid reply"),
    ]
}

/// Parsed form of a plain AI reply.
pub fn plain_reply(text: &str) -> AiMessage {
    AiMessage::text(text)
}
