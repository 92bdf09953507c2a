//! `PostgreSQL` integration tests for the message store.
//!
//! Runs against the database named by `ASSISTANT_DATABASE_URL` (or
//! `DATABASE_URL`). Each test works in its own schema, dropped on exit.
//! Without a configured URL the tests return early.

use std::sync::Arc;

use assistant_core::{
    config::{ConfigError, StoreConfig},
    session::{
        adapters::{entity::MessageEntity, postgres::PostgresMessageStore},
        domain::{MessageId, Sender, SessionId, SessionMessage},
        error::StorageError,
        ports::MessageStore,
        services::AiMessageRepository,
    },
};
use diesel::connection::SimpleConnection;
use mockable::DefaultClock;
use rstest::rstest;
use uuid::Uuid;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// SQL creating the message table.
const CREATE_MESSAGES_SQL: &str =
    include_str!("../migrations/2026-10-18-000000_create_session_messages/up.sql");

/// A store bound to a throwaway schema.
struct SchemaContext {
    config: StoreConfig,
    schema: String,
    store: PostgresMessageStore,
}

impl SchemaContext {
    /// Creates the schema, or returns `None` when no database is configured.
    fn create() -> Result<Option<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let url = match StoreConfig::from_env() {
            Ok(config) => config.database_url,
            Err(ConfigError::MissingDatabaseUrl) => return Ok(None),
            Err(other) => return Err(other.into()),
        };
        // One connection, so the search path set below applies to every query.
        let config = StoreConfig::single_connection(url);
        let pool = config.build_pool()?;
        let schema = format!("assistant_test_{}", Uuid::new_v4().simple());
        pool.get()?.batch_execute(&format!(
            "CREATE SCHEMA {schema}; SET search_path TO {schema}; {CREATE_MESSAGES_SQL}"
        ))?;
        Ok(Some(Self {
            config,
            schema,
            store: PostgresMessageStore::new(pool),
        }))
    }

    fn cleanup(self) -> TestResult {
        let schema = self.schema;
        drop(self.store);
        let pool = self.config.build_pool()?;
        pool.get()?
            .batch_execute(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))?;
        Ok(())
    }
}

fn text_at(text: &str, timestamp: i64) -> Result<SessionMessage, Box<dyn std::error::Error + Send + Sync>> {
    Ok(SessionMessage::builder(Sender::User)
        .with_text(text)
        .with_timestamp(timestamp)
        .build(&DefaultClock)?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_get_and_delete() -> TestResult {
    let Some(context) = SchemaContext::create()? else {
        return Ok(());
    };
    let session = SessionId::new("s1");
    let entity = MessageEntity::try_from_domain(&session, &text_at("hello", 1)?)?;

    context.store.insert(&entity).await?;
    let found = context.store.get_message(&entity.message_id()).await?;
    assert_eq!(found.as_ref(), Some(&entity));

    context.store.delete(&entity).await?;
    assert!(context.store.get_message(&entity.message_id()).await?.is_none());

    context.cleanup()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_ids_are_rejected() -> TestResult {
    let Some(context) = SchemaContext::create()? else {
        return Ok(());
    };
    let entity = MessageEntity::try_from_domain(&SessionId::new("s1"), &text_at("once", 1)?)?;
    context.store.insert(&entity).await?;

    let result = context.store.insert(&entity).await;

    assert!(matches!(result, Err(StorageError::Duplicate(id)) if id == entity.message_id()));
    context.cleanup()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn session_rows_are_chronological_with_stable_ties() -> TestResult {
    let Some(context) = SchemaContext::create()? else {
        return Ok(());
    };
    let session = SessionId::new("s1");
    let other = SessionId::new("s2");
    for (owner, text, timestamp) in [
        (&session, "late", 30),
        (&other, "elsewhere", 10),
        (&session, "early", 10),
        (&session, "tie-first", 20),
        (&session, "tie-second", 20),
    ] {
        let entity = MessageEntity::try_from_domain(owner, &text_at(text, timestamp)?)?;
        context.store.insert(&entity).await?;
    }

    let texts: Vec<Option<String>> = context
        .store
        .get_messages_for_session(&session)
        .await?
        .into_iter()
        .map(|entity| entity.text_content)
        .collect();

    assert_eq!(
        texts,
        ["early", "tie-first", "tie-second", "late"]
            .map(|text| Some(text.to_owned()))
            .to_vec()
    );
    context.cleanup()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repository_reloads_ai_payload_verbatim() -> TestResult {
    let Some(context) = SchemaContext::create()? else {
        return Ok(());
    };
    let session = SessionId::new("s1");
    let raw = r#"{ "preText": "spacing kept" }"#;
    let reply = SessionMessage::ai_reply(raw, &DefaultClock)?;
    let repository = AiMessageRepository::new(Arc::new(context.store.clone()));

    repository.store_message(&session, reply.clone()).await?;
    repository.clear_cache(&session);
    let loaded = repository.load_messages(&session).await;

    assert_eq!(loaded.as_slice(), [reply].as_slice());
    assert_eq!(
        loaded.first().and_then(SessionMessage::ai_message_json),
        Some(raw)
    );
    context.cleanup()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_identifiers_are_stored() -> TestResult {
    let Some(context) = SchemaContext::create()? else {
        return Ok(());
    };
    let session = SessionId::new("s".repeat(300));
    let message = SessionMessage::builder(Sender::User)
        .with_id(MessageId::new("m".repeat(300)))
        .with_text("long ids")
        .build(&DefaultClock)?;
    let entity = MessageEntity::try_from_domain(&session, &message)?;

    context.store.insert(&entity).await?;

    let rows = context.store.get_messages_for_session(&session).await?;
    assert_eq!(rows, vec![entity]);
    context.cleanup()
}
