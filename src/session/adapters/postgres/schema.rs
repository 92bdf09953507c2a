//! Diesel schema for session message persistence.

diesel::table! {
    /// One row per session message.
    session_messages (id) {
        /// Message identifier.
        id -> Text,
        /// Insertion order, the tie-breaker for equal timestamps.
        position -> Int8,
        /// Owning session.
        session_id -> Text,
        /// Creation time, epoch millis.
        timestamp_ms -> Int8,
        /// Originator.
        #[max_length = 16]
        sender -> Varchar,
        /// Serialised rich user content.
        rich_content -> Nullable<Text>,
        /// Plain text content.
        text_content -> Nullable<Text>,
        /// Serialised parsed AI reply.
        ai_message -> Nullable<Text>,
        /// Raw AI payload.
        ai_message_json -> Nullable<Text>,
        /// Serialised system message.
        system_message -> Nullable<Text>,
        /// Serialised automation metadata.
        execution_metadata -> Nullable<Text>,
        /// Hidden from prompt history.
        exclude_from_prompt -> Bool,
    }
}
