//! Message repository: durable storage plus a live per-session view.
//!
//! The store is the source of truth. The cache holds one watch channel per
//! session and is only ever updated after the store has accepted the change,
//! so a message visible to an observer is always durable.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::session::{
    adapters::entity::MessageEntity,
    domain::{MessageId, SessionId, SessionMessage},
    error::StorageError,
    ports::MessageStore,
};

/// Snapshot of a session's messages, oldest first.
///
/// All observers of a publication share the same allocation.
pub type MessageList = Arc<Vec<SessionMessage>>;

type SessionCache = HashMap<SessionId, watch::Sender<MessageList>>;

/// Live view of one session's message list.
///
/// Returned by [`AiMessageRepository::observe_messages`].
#[derive(Debug, Clone)]
pub struct MessageStream {
    receiver: watch::Receiver<MessageList>,
}

impl MessageStream {
    /// Returns the latest published list.
    #[must_use]
    pub fn current(&self) -> MessageList {
        Arc::clone(&self.receiver.borrow())
    }

    /// Returns `true` if a list was published since the last read.
    ///
    /// A stream whose cache entry was cleared reports `false`.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Waits for the next publication and returns it.
    ///
    /// Returns `None` once the session's cache entry has been cleared.
    pub async fn changed(&mut self) -> Option<MessageList> {
        self.receiver.changed().await.ok()?;
        Some(Arc::clone(&self.receiver.borrow_and_update()))
    }
}

/// Synchronises durable message storage with observable per-session lists.
///
/// Construct one per process and share it by `Arc`. Independent sessions may
/// be used concurrently; each session is expected to have a single writer.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use assistant_core::session::adapters::memory::InMemoryMessageStore;
/// use assistant_core::session::domain::{SessionId, SessionMessage};
/// use assistant_core::session::services::AiMessageRepository;
/// use mockable::DefaultClock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = AiMessageRepository::new(Arc::new(InMemoryMessageStore::new()));
/// let session = SessionId::new("s1");
/// let stream = repository.observe_messages(&session);
///
/// repository
///     .store_message(&session, SessionMessage::module_response("hello", &DefaultClock))
///     .await?;
/// assert_eq!(stream.current().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AiMessageRepository<S> {
    store: Arc<S>,
    cache: Arc<RwLock<SessionCache>>,
}

impl<S> Clone for AiMessageRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: MessageStore + 'static> AiMessageRepository<S> {
    /// Creates a repository over `store` with an empty cache.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Durably stores a message, then appends it to the session's list.
    ///
    /// The write and the cache update run on their own task, so dropping the
    /// returned future after the call has started does not separate them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the message cannot be encoded or the store
    /// rejects it. The cache is untouched and observers are not notified.
    pub async fn store_message(
        &self,
        session_id: &SessionId,
        message: SessionMessage,
    ) -> Result<(), StorageError> {
        let entity = MessageEntity::try_from_domain(session_id, &message)?;
        let store = Arc::clone(&self.store);
        let cache = Arc::clone(&self.cache);
        let owner = session_id.clone();

        let write = tokio::spawn(async move {
            store.insert(&entity).await?;
            append_cached(&cache, &owner, message);
            Ok::<(), StorageError>(())
        });

        let outcome = match write.await {
            Ok(result) => result,
            Err(join_error) => Err(StorageError::Task(join_error.to_string())),
        };

        match &outcome {
            Ok(()) => tracing::debug!(session_id = %session_id, "stored session message"),
            Err(error) => tracing::error!(
                session_id = %session_id,
                error = %error,
                "failed to store session message"
            ),
        }
        outcome
    }

    /// Deletes a message, best effort.
    ///
    /// A missing message, or one owned by another session, is a no-op.
    /// Store failures are logged and swallowed; the cache only changes after
    /// a successful delete.
    pub async fn delete_message(&self, session_id: &SessionId, message_id: &MessageId) {
        let entity = match self.store.get_message(message_id).await {
            Ok(Some(entity)) if entity.session_id == session_id.as_str() => entity,
            Ok(Some(_)) => {
                tracing::debug!(
                    session_id = %session_id,
                    message_id = %message_id,
                    "message to delete belongs to another session"
                );
                return;
            }
            Ok(None) => {
                tracing::debug!(
                    session_id = %session_id,
                    message_id = %message_id,
                    "message to delete not found"
                );
                return;
            }
            Err(error) => {
                tracing::warn!(
                    session_id = %session_id,
                    message_id = %message_id,
                    error = %error,
                    "failed to look up message for deletion"
                );
                return;
            }
        };

        if let Err(error) = self.store.delete(&entity).await {
            tracing::warn!(
                session_id = %session_id,
                message_id = %message_id,
                error = %error,
                "failed to delete message"
            );
            return;
        }

        remove_cached(&self.cache, session_id, message_id);
    }

    /// Returns a live view of a session's messages.
    ///
    /// Never blocks and never loads: an unobserved session starts empty
    /// until [`Self::load_messages`] or [`Self::store_message`] publishes.
    #[must_use]
    pub fn observe_messages(&self, session_id: &SessionId) -> MessageStream {
        let mut guard = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let sender = guard
            .entry(session_id.clone())
            .or_insert_with(|| watch::Sender::new(MessageList::default()));
        MessageStream {
            receiver: sender.subscribe(),
        }
    }

    /// Reads a session's persisted messages and replaces the cached list.
    ///
    /// A store failure is logged and yields an empty list, leaving the cache
    /// as it was. Rows that no longer decode are skipped with a warning.
    pub async fn load_messages(&self, session_id: &SessionId) -> MessageList {
        let entities = match self.store.get_messages_for_session(session_id).await {
            Ok(entities) => entities,
            Err(error) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %error,
                    "failed to load session messages"
                );
                return MessageList::default();
            }
        };

        let messages: Vec<SessionMessage> = entities
            .into_iter()
            .filter_map(|entity| {
                let message_id = entity.id.clone();
                entity
                    .into_domain()
                    .inspect_err(|error| {
                        tracing::warn!(
                            session_id = %session_id,
                            message_id = %message_id,
                            error = %error,
                            "skipping undecodable message"
                        );
                    })
                    .ok()
            })
            .collect();

        let list = Arc::new(messages);
        replace_cached(&self.cache, session_id, Arc::clone(&list));
        tracing::debug!(session_id = %session_id, count = list.len(), "loaded session messages");
        list
    }

    /// Drops a session's cache entry. Durable storage is not touched.
    ///
    /// Open streams for the session stop receiving updates.
    pub fn clear_cache(&self, session_id: &SessionId) {
        let mut guard = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if guard.remove(session_id).is_some() {
            tracing::debug!(session_id = %session_id, "cleared session cache");
        }
    }

    /// Returns `true` if the session has a cache entry.
    #[must_use]
    pub fn is_cached(&self, session_id: &SessionId) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(session_id)
    }
}

fn append_cached(cache: &RwLock<SessionCache>, session_id: &SessionId, message: SessionMessage) {
    let mut guard = cache.write().unwrap_or_else(PoisonError::into_inner);
    guard
        .entry(session_id.clone())
        .or_insert_with(|| watch::Sender::new(MessageList::default()))
        .send_modify(|list| Arc::make_mut(list).push(message));
}

fn replace_cached(cache: &RwLock<SessionCache>, session_id: &SessionId, list: MessageList) {
    let mut guard = cache.write().unwrap_or_else(PoisonError::into_inner);
    match guard.get(session_id) {
        Some(sender) => sender.send_modify(|current| *current = list),
        None => {
            guard.insert(session_id.clone(), watch::Sender::new(list));
        }
    }
}

fn remove_cached(cache: &RwLock<SessionCache>, session_id: &SessionId, message_id: &MessageId) {
    let guard = cache.read().unwrap_or_else(PoisonError::into_inner);
    if let Some(sender) = guard.get(session_id) {
        sender.send_if_modified(|list| {
            if list.iter().any(|message| message.id() == message_id) {
                Arc::make_mut(list).retain(|message| message.id() != message_id);
                true
            } else {
                false
            }
        });
    }
}
