//! Tests for the session cost action handler.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::fixtures::session_id;
use crate::command::{
    adapters::ActionRouter,
    domain::{Command, CommandResult, CommandStatus, ParamMap, ParamValue},
    ports::{ActionHandler, Coordinator},
    services::CommandExecutor,
};
use crate::config::PricingTable;
use crate::session::{
    adapters::memory::InMemoryUsageLedger,
    domain::{ModelPricing, SessionId, TokenUsage},
    error::StorageError,
    ports::MockUsageSource,
    services::{GET_COST_ACTION, SessionCostHandler},
};

#[expect(clippy::float_arithmetic, reason = "tolerance comparison of costs")]
fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[fixture]
fn pricing() -> PricingTable {
    PricingTable::new()
        .with_pricing("claude", ModelPricing::new(4.0, 20.0).with_cache_rates(0.5, 5.0))
}

fn params_for(session_id: &SessionId) -> ParamMap {
    let mut params = ParamMap::new();
    params.insert("sessionId".to_owned(), ParamValue::from(session_id.as_str()));
    params
}

fn requested<'a>(result: &'a CommandResult, key: &str) -> Option<&'a ParamValue> {
    result.requested_data().and_then(|data| data.get(key))
}

fn ledger_with(session_id: &SessionId, provider_id: &str, usage: TokenUsage) -> Arc<InMemoryUsageLedger> {
    let ledger = InMemoryUsageLedger::new();
    ledger
        .record(session_id, provider_id, usage)
        .expect("ledger lock");
    Arc::new(ledger)
}

#[rstest]
#[case(ParamMap::new())]
#[case(ParamMap::from([("sessionId".to_owned(), ParamValue::from("  "))]))]
#[case(ParamMap::from([("sessionId".to_owned(), ParamValue::from(7_i64))]))]
#[tokio::test]
async fn missing_session_id_is_invalid_format(#[case] params: ParamMap, pricing: PricingTable) {
    let mut usage = MockUsageSource::new();
    usage.expect_session_usage().never();
    let handler = SessionCostHandler::new(Arc::new(usage), pricing);

    let result = handler.handle(&params).await;

    assert_eq!(result.status(), CommandStatus::InvalidFormat);
    assert_eq!(result.error(), Some("sessionId is required"));
}

#[rstest]
#[tokio::test]
async fn session_without_usage_has_no_price(pricing: PricingTable, session_id: SessionId) {
    let handler = SessionCostHandler::new(Arc::new(InMemoryUsageLedger::new()), pricing);

    let result = handler.handle(&params_for(&session_id)).await;

    assert_eq!(result.status(), CommandStatus::Success);
    let data = result.requested_data().expect("requested data");
    assert_eq!(data.len(), 1);
    assert_eq!(
        data.get("priceAvailable").and_then(ParamValue::as_bool),
        Some(false)
    );
}

#[rstest]
#[tokio::test]
async fn unpriced_provider_has_no_price(pricing: PricingTable, session_id: SessionId) {
    let ledger = ledger_with(&session_id, "local-model", TokenUsage::new(10, 0, 0, 5));
    let handler = SessionCostHandler::new(ledger, pricing);

    let result = handler.handle(&params_for(&session_id)).await;

    assert_eq!(result.status(), CommandStatus::Success);
    assert_eq!(
        requested(&result, "priceAvailable").and_then(ParamValue::as_bool),
        Some(false)
    );
    assert!(requested(&result, "totalCost").is_none());
}

#[rstest]
#[tokio::test]
async fn usage_read_failure_is_an_error(pricing: PricingTable, session_id: SessionId) {
    let mut usage = MockUsageSource::new();
    usage
        .expect_session_usage()
        .times(1)
        .returning(|_| Err(StorageError::connection("ledger offline")));
    let handler = SessionCostHandler::new(Arc::new(usage), pricing);

    let result = handler.handle(&params_for(&session_id)).await;

    assert_eq!(result.status(), CommandStatus::Error);
    assert!(
        result
            .error()
            .is_some_and(|error| error.starts_with("failed to read usage"))
    );
}

#[rstest]
#[tokio::test]
async fn priced_session_reports_every_field(pricing: PricingTable, session_id: SessionId) {
    let ledger = ledger_with(
        &session_id,
        "claude",
        TokenUsage::new(1_000_000, 500_000, 250_000, 100_000),
    );
    let handler = SessionCostHandler::new(ledger, pricing);

    let result = handler.handle(&params_for(&session_id)).await;

    assert_eq!(result.status(), CommandStatus::Success);
    assert_eq!(
        requested(&result, "priceAvailable").and_then(ParamValue::as_bool),
        Some(true)
    );
    for (key, expected) in [
        ("totalInputTokens", 1_000_000),
        ("totalCacheWriteTokens", 500_000),
        ("totalCacheReadTokens", 250_000),
        ("totalOutputTokens", 100_000),
        ("regularInputTokens", 250_000),
    ] {
        assert_eq!(
            requested(&result, key).and_then(ParamValue::as_i64),
            Some(expected),
            "{key}"
        );
    }
    for (key, expected) in [
        ("inputCost", 1.0),
        ("cacheWriteCost", 2.5),
        ("cacheReadCost", 0.125),
        ("outputCost", 2.0),
        ("totalCost", 5.625),
    ] {
        let actual = requested(&result, key)
            .and_then(ParamValue::as_f64)
            .expect(key);
        assert!(approx(actual, expected), "{key}: {actual}");
    }
}

#[rstest]
#[tokio::test]
async fn cost_action_runs_through_the_router(pricing: PricingTable, session_id: SessionId) {
    let ledger = ledger_with(&session_id, "claude", TokenUsage::new(0, 0, 0, 1_000_000));
    let router = ActionRouter::new()
        .with_handler(GET_COST_ACTION, Arc::new(SessionCostHandler::new(ledger, pricing)))
        .expect("registration");

    let direct = router
        .process_action(GET_COST_ACTION, &params_for(&session_id))
        .await;
    let executor = CommandExecutor::new(Arc::new(router));
    let command = Command::new(GET_COST_ACTION)
        .expect("valid action")
        .with_param("sessionId", session_id.as_str())
        .with_id("cost-1");
    let executed = executor.execute(&command).await;

    assert!(direct.status().is_success());
    assert_eq!(executed.command_id(), Some("cost-1"));
    let total = requested(&executed, "totalCost")
        .and_then(ParamValue::as_f64)
        .expect("total cost");
    assert!(approx(total, 20.0));
}
