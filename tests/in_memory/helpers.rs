//! Shared test helpers for in-memory integration tests.

use std::io;
use std::sync::Arc;

use assistant_core::session::{
    adapters::memory::InMemoryMessageStore,
    domain::{RichMessage, SessionId, SessionMessage, SystemMessage, SystemMessageKind},
    services::AiMessageRepository,
};
use mockable::DefaultClock;
use rstest::fixture;
use tokio::runtime::Runtime;

/// Repository over an in-memory store.
pub type TestRepository = AiMessageRepository<InMemoryMessageStore>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh in-memory store for each test.
#[fixture]
pub fn store() -> Arc<InMemoryMessageStore> {
    Arc::new(InMemoryMessageStore::new())
}

/// Provides the session most tests write to.
#[fixture]
pub fn session_id() -> SessionId {
    SessionId::new("s1")
}

/// A short chat: question, reply with an action, results, UI-only notice.
///
/// # Errors
///
/// Returns an error if the AI payload does not decode.
pub fn conversation() -> Result<Vec<SessionMessage>, Box<dyn std::error::Error + Send + Sync>> {
    let clock = DefaultClock;
    Ok(vec![
        SessionMessage::user_chat(RichMessage::new("Add a note about my run"), &clock),
        SessionMessage::ai_reply(
            r#"{"preText":"Adding it.","actions":[{"action":"notes.add","params":{"text":"5k run"}}]}"#,
            &clock,
        )?,
        SessionMessage::system(
            SystemMessage::new(SystemMessageKind::Actions, "1 action executed"),
            &clock,
        ),
        SessionMessage::post_action_notice("Note added", &clock),
    ])
}
