//! Handler for the `ai_sessions.get_cost` action.

use std::sync::Arc;

use async_trait::async_trait;

use crate::command::domain::{CommandResult, CommandStatus, ParamMap};
use crate::command::ports::ActionHandler;
use crate::config::PricingTable;
use crate::session::{
    domain::{CostBreakdown, SessionId},
    ports::UsageSource,
};

/// Action name the cost handler is registered under.
pub const GET_COST_ACTION: &str = "ai_sessions.get_cost";

/// Reports a session's accumulated token usage and its price.
///
/// When either the usage or the provider's pricing is unknown the result is
/// still a success, carrying only `priceAvailable: false`.
#[derive(Debug)]
pub struct SessionCostHandler<U> {
    usage: Arc<U>,
    pricing: PricingTable,
}

impl<U: UsageSource> SessionCostHandler<U> {
    /// Creates a handler reading usage from `usage` and prices from `pricing`.
    #[must_use]
    pub const fn new(usage: Arc<U>, pricing: PricingTable) -> Self {
        Self { usage, pricing }
    }

    fn unavailable() -> CommandResult {
        CommandResult::success().with_requested_value("priceAvailable", false)
    }
}

#[async_trait]
impl<U: UsageSource> ActionHandler for SessionCostHandler<U> {
    async fn handle(&self, params: &ParamMap) -> CommandResult {
        let Some(session_id) = params
            .get("sessionId")
            .and_then(|value| value.as_str())
            .filter(|id| !id.trim().is_empty())
            .map(SessionId::new)
        else {
            return CommandResult::failure(CommandStatus::InvalidFormat, "sessionId is required");
        };

        let recorded = match self.usage.session_usage(&session_id).await {
            Ok(recorded) => recorded,
            Err(error) => {
                tracing::warn!(session_id = %session_id, error = %error, "failed to read session usage");
                return CommandResult::failure(
                    CommandStatus::Error,
                    format!("failed to read usage: {error}"),
                );
            }
        };

        let Some(session_usage) = recorded else {
            return Self::unavailable();
        };
        let Some(pricing) = self.pricing.get(&session_usage.provider_id) else {
            tracing::debug!(
                session_id = %session_id,
                provider_id = %session_usage.provider_id,
                "no pricing for provider"
            );
            return Self::unavailable();
        };

        let cost = CostBreakdown::compute(session_usage.usage, pricing);
        let usage = cost.usage;
        CommandResult::success()
            .with_requested_value("priceAvailable", true)
            .with_requested_value("totalInputTokens", usage.input)
            .with_requested_value("totalCacheWriteTokens", usage.cache_write)
            .with_requested_value("totalCacheReadTokens", usage.cache_read)
            .with_requested_value("totalOutputTokens", usage.output)
            .with_requested_value("regularInputTokens", usage.regular_input())
            .with_requested_value("inputCost", cost.input_cost)
            .with_requested_value("cacheWriteCost", cost.cache_write_cost)
            .with_requested_value("cacheReadCost", cost.cache_read_cost)
            .with_requested_value("outputCost", cost.output_cost)
            .with_requested_value("totalCost", cost.total_cost())
    }
}
