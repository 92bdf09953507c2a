//! Command batches executed end to end through an in-process router.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::in_memory::helpers::runtime;
use assistant_core::{
    command::{
        adapters::ActionRouter,
        domain::{CommandResult, CommandStatus, ParamMap, ParamValue},
        parser::{parse_result, results_to_json},
        ports::ActionHandler,
        services::CommandExecutor,
    },
    config::PricingTable,
    session::{
        adapters::memory::InMemoryUsageLedger,
        domain::{ModelPricing, SessionId, TokenUsage},
        services::{GET_COST_ACTION, SessionCostHandler},
    },
};
use async_trait::async_trait;
use rstest::rstest;
use serde_json::json;
use tokio::runtime::Runtime;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Handler returning a fixed result and counting its calls.
struct FixedHandler {
    result: CommandResult,
    calls: AtomicUsize,
}

impl FixedHandler {
    fn new(result: CommandResult) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActionHandler for FixedHandler {
    async fn handle(&self, _params: &ParamMap) -> CommandResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// A batch pauses at the first command awaiting validation.
#[rstest]
fn validation_pauses_the_rest_of_the_batch(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let listed = FixedHandler::new(CommandResult::success().with_requested_value("count", 3_i64));
    let guarded = FixedHandler::new(CommandResult::failure(
        CommandStatus::ValidationRequired,
        "delete needs confirmation",
    ));
    let router = ActionRouter::new()
        .with_handler("zones.list", Arc::clone(&listed) as Arc<dyn ActionHandler>)?
        .with_handler("zones.delete", Arc::clone(&guarded) as Arc<dyn ActionHandler>)?;
    let executor = CommandExecutor::new(Arc::new(router));
    let batch = json!([
        { "action": "zones.list" },
        { "action": "zones.delete", "params": { "zoneId": "z1" } },
        { "action": "zones.list", "id": "after" }
    ])
    .to_string();

    let results = rt.block_on(executor.execute_json(&batch));

    let statuses: Vec<CommandStatus> = results.iter().map(CommandResult::status).collect();
    assert_eq!(
        statuses,
        vec![
            CommandStatus::Success,
            CommandStatus::ValidationRequired,
            CommandStatus::Cancelled
        ]
    );
    assert_eq!(listed.calls(), 1);
    assert_eq!(guarded.calls(), 1);
    let last = results.last().ok_or("three results")?;
    assert_eq!(last.command_index(), Some(2));
    assert_eq!(last.command_id(), Some("after"));
    Ok(())
}

/// Results survive the wire format the UI consumes.
#[rstest]
fn results_serialise_for_the_ui(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let executor = CommandExecutor::new(Arc::new(ActionRouter::new()));

    let results = rt.block_on(executor.execute_json(r#"[{"action":"nowhere.go"}]"#));
    let wire = results_to_json(&results)?;
    let decoded: Vec<serde_json::Value> = serde_json::from_str(&wire)?;

    let first = decoded.first().ok_or("one result")?;
    assert_eq!(
        first.get("status").and_then(serde_json::Value::as_str),
        Some("UNKNOWN_ACTION")
    );
    assert_eq!(
        first.get("commandIndex").and_then(serde_json::Value::as_u64),
        Some(0)
    );
    let reparsed = parse_result(&first.to_string())?;
    assert_eq!(Some(&reparsed), results.first());
    Ok(())
}

/// A malformed batch never reaches a handler.
#[rstest]
fn malformed_batch_is_reported_once(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let handler = FixedHandler::new(CommandResult::success());
    let router = ActionRouter::new().with_handler("x", Arc::clone(&handler) as Arc<dyn ActionHandler>)?;
    let executor = CommandExecutor::new(Arc::new(router));

    let results = rt.block_on(executor.execute_json(r#"[{"action":"x"},{"action":""}]"#));

    assert_eq!(results.len(), 1);
    let only = results.first().ok_or("one result")?;
    assert_eq!(only.status(), CommandStatus::InvalidFormat);
    assert!(only.error().is_some_and(|error| error.contains("index 1")));
    assert_eq!(handler.calls(), 0);
    Ok(())
}

/// The cost action answers an AI-issued batch.
#[rstest]
fn cost_query_runs_inside_a_batch(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let ledger = InMemoryUsageLedger::new();
    let session = SessionId::new("s1");
    ledger.record(&session, "claude", TokenUsage::new(600_000, 0, 0, 0))?;
    ledger.record(&session, "claude", TokenUsage::new(400_000, 0, 0, 0))?;
    let pricing = PricingTable::new().with_pricing("claude", ModelPricing::new(3.0, 15.0));
    let router = ActionRouter::new().with_handler(
        GET_COST_ACTION,
        Arc::new(SessionCostHandler::new(Arc::new(ledger), pricing)),
    )?;
    let executor = CommandExecutor::new(Arc::new(router));
    let batch = json!([{ "action": GET_COST_ACTION, "params": { "sessionId": "s1" } }]).to_string();

    let results = rt.block_on(executor.execute_json(&batch));

    let data = results
        .first()
        .and_then(CommandResult::requested_data)
        .ok_or("cost data")?;
    assert_eq!(
        data.get("totalInputTokens").and_then(ParamValue::as_i64),
        Some(1_000_000)
    );
    let total = data
        .get("totalCost")
        .and_then(ParamValue::as_f64)
        .ok_or("total cost")?;
    assert!(total > 2.999 && total < 3.001);
    Ok(())
}
