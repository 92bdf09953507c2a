//! Repository behaviour over the in-memory store.
//!
//! Covers the write-then-publish flow, reload after a restart, and prompt
//! history built from a loaded conversation.

use std::io;
use std::sync::Arc;

use crate::in_memory::helpers::{TestRepository, conversation, runtime, session_id, store};
use assistant_core::session::{
    adapters::memory::InMemoryMessageStore,
    domain::{Sender, SessionId, SessionMessage},
    services::{AiMessageRepository, PromptHistory, PromptRole},
};
use mockable::DefaultClock;
use rstest::rstest;
use tokio::runtime::Runtime;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Stores A then B and expects both load and observation to agree.
#[rstest]
fn user_then_ai_message_round_trip(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryMessageStore>,
    session_id: SessionId,
) -> TestResult {
    let rt = runtime?;
    let repository = TestRepository::new(store);
    let stream = repository.observe_messages(&session_id);
    let first = SessionMessage::builder(Sender::User)
        .with_text("hello")
        .build(&DefaultClock)?;
    let second = SessionMessage::ai_reply(r#"{"preText":"hi"}"#, &DefaultClock)?;

    rt.block_on(repository.store_message(&session_id, first.clone()))?;
    rt.block_on(repository.store_message(&session_id, second.clone()))?;
    let loaded = rt.block_on(repository.load_messages(&session_id));

    assert_eq!(loaded.as_slice(), [first, second].as_slice());
    assert_eq!(stream.current().as_slice(), loaded.as_slice());
    Ok(())
}

/// A new repository over the same store sees everything after a load.
#[rstest]
fn messages_survive_a_fresh_repository(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryMessageStore>,
    session_id: SessionId,
) -> TestResult {
    let rt = runtime?;
    let messages = conversation()?;
    let writer = TestRepository::new(Arc::clone(&store));
    for message in &messages {
        rt.block_on(writer.store_message(&session_id, message.clone()))?;
    }

    let reader = AiMessageRepository::new(store);
    assert!(reader.observe_messages(&session_id).current().is_empty());
    let loaded = rt.block_on(reader.load_messages(&session_id));

    assert_eq!(loaded.as_slice(), messages.as_slice());
    Ok(())
}

/// Prompt history of a reloaded conversation drops only UI-only messages.
#[rstest]
fn loaded_conversation_builds_prompt_history(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryMessageStore>,
    session_id: SessionId,
) -> TestResult {
    let rt = runtime?;
    let repository = TestRepository::new(store);
    for message in conversation()? {
        rt.block_on(repository.store_message(&session_id, message))?;
    }

    let loaded = rt.block_on(repository.load_messages(&session_id));
    let history = PromptHistory::from_messages(&loaded);

    let roles: Vec<PromptRole> = history.iter().map(|entry| entry.role).collect();
    assert_eq!(
        roles,
        vec![PromptRole::User, PromptRole::Assistant, PromptRole::System]
    );
    let reply = history.get(1).map(|entry| entry.content.as_str());
    assert_eq!(
        reply,
        loaded.get(1).and_then(SessionMessage::ai_message_json)
    );
    Ok(())
}

/// Deleting a provisional message removes it everywhere.
#[rstest]
fn deleted_message_disappears_after_reload(
    runtime: io::Result<Runtime>,
    store: Arc<InMemoryMessageStore>,
    session_id: SessionId,
) -> TestResult {
    let rt = runtime?;
    let repository = TestRepository::new(Arc::clone(&store));
    let messages = conversation()?;
    for message in &messages {
        rt.block_on(repository.store_message(&session_id, message.clone()))?;
    }
    let provisional = messages.last().ok_or("conversation is not empty")?;

    rt.block_on(repository.delete_message(&session_id, provisional.id()));
    repository.clear_cache(&session_id);
    let loaded = rt.block_on(repository.load_messages(&session_id));

    assert_eq!(loaded.len(), messages.len() - 1);
    assert!(loaded.iter().all(|message| message.id() != provisional.id()));
    assert_eq!(store.len(), messages.len() - 1);
    Ok(())
}
