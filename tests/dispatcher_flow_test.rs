//! Operation selection, form population and submission against mock collaborators

mod common;

use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;

use panarchy_console::core::{MessageLevel, SubmissionResult};
use panarchy_console::domain::preimage::commitment_hash;
use panarchy_console::domain::{FieldKind, FormValues};
use panarchy_console::error::ContractCallError;
use panarchy_console::services::Dispatcher;

use common::{account, context_with, entries, new_log, MockContract, MockWallet};

fn uint(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 256)
}

#[tokio::test]
async fn test_transfer_sends_from_first_account() {
    let log = new_log();
    let wallet = Arc::new(MockWallet::on_chain(2013, log.clone()).authorized());
    let contract = Arc::new(MockContract::new(log.clone()));
    let (context, _) = context_with(Some(wallet), Some(contract.clone()));
    let dispatcher = Dispatcher::new(context.clone());

    let values = FormValues::new()
        .with("token", "1")
        .with("to", "0xABC")
        .with("value", "100");
    let result = dispatcher.submit("transfer", &values).await;

    assert_eq!(
        result,
        SubmissionResult::Success("Transaction successful for Transfer!".into())
    );
    assert_eq!(entries(&log), vec!["eth_accounts", "eth_gasPrice", "send:transfer"]);

    let sends = contract.recorded_sends();
    assert_eq!(sends.len(), 1);
    let (method, args, options) = &sends[0];
    assert_eq!(method, "transfer");
    assert_eq!(args, &vec!["0xABC", "100", "1"]);
    assert_eq!(options.from, account());
    assert_eq!(options.gas_price, 7_000_000_000);

    let session = context.snapshot();
    assert!(session.result_visible());
    assert_eq!(session.result, Some(result));
}

#[tokio::test]
async fn test_send_without_accounts_fails() {
    let log = new_log();
    let wallet = Arc::new(MockWallet::on_chain(2013, log.clone()));
    let contract = Arc::new(MockContract::new(log.clone()));
    let (context, _) = context_with(Some(wallet), Some(contract.clone()));
    let dispatcher = Dispatcher::new(context);

    let result = dispatcher.submit("optIn", &FormValues::new()).await;

    assert_eq!(
        result,
        SubmissionResult::Failure(format!("Transaction failed: {}", ContractCallError::NoSender))
    );
    assert!(contract.recorded_sends().is_empty());
}

#[tokio::test]
async fn test_reverted_send_reports_failure() {
    let log = new_log();
    let wallet = Arc::new(MockWallet::on_chain(2013, log.clone()).authorized());
    let mut contract = MockContract::new(log.clone());
    contract.send_error = Some(ContractCallError::Reverted("0x11".into()));
    let (context, _) = context_with(Some(wallet), Some(Arc::new(contract)));
    let dispatcher = Dispatcher::new(context);

    let result = dispatcher.submit("shuffle", &FormValues::new()).await;

    assert!(!result.is_success());
    assert_eq!(result.text(), "Transaction failed: transaction 0x11 reverted");
}

#[tokio::test]
async fn test_register_sends_commitment() {
    let log = new_log();
    let wallet = Arc::new(MockWallet::on_chain(2013, log.clone()).authorized());
    let contract = Arc::new(MockContract::new(log.clone()));
    let (context, _) = context_with(Some(wallet), Some(contract.clone()));
    let dispatcher = Dispatcher::new(context);

    let preimage = "7".repeat(64);
    let values = FormValues::new().with("randomNumber", preimage.clone());
    let result = dispatcher.submit("register", &values).await;

    assert_eq!(result.text(), "Transaction successful for Register!");
    let sends = contract.recorded_sends();
    let expected = format!("0x{}", hex::encode(commitment_hash(&preimage)));
    assert_eq!(sends[0].1, vec![expected]);
}

#[tokio::test]
async fn test_balance_reads_schedule_at_submit() {
    let log = new_log();
    let wallet = Arc::new(MockWallet::on_chain(2013, log.clone()));
    let contract = Arc::new(
        MockContract::new(log.clone())
            .with_schedule(Some(12))
            .respond("balanceOf", Ok(vec![uint(42)])),
    );
    let (context, _) = context_with(Some(wallet), Some(contract.clone()));
    let dispatcher = Dispatcher::new(context);

    let values = FormValues::new().with("token", "0").with("account", "0xA");
    let result = dispatcher.submit("balanceOf", &values).await;

    assert_eq!(result, SubmissionResult::Success("Balance: 42".into()));
    assert_eq!(entries(&log), vec!["call:schedule", "call:balanceOf"]);
    let calls = contract.recorded_calls();
    assert_eq!(calls[1].1, vec!["12", "0", "0xA"]);
}

#[tokio::test]
async fn test_query_failure_is_shown() {
    let log = new_log();
    let contract = Arc::new(MockContract::new(log.clone()).respond(
        "seed",
        Err(ContractCallError::Rpc("execution reverted".into())),
    ));
    let (context, _) = context_with(None, Some(contract));
    let dispatcher = Dispatcher::new(context.clone());

    let values = FormValues::new().with("t", "3");
    let result = dispatcher.submit("seed", &values).await;

    assert_eq!(
        result,
        SubmissionResult::Failure("Transaction failed: execution reverted".into())
    );
    assert!(context.snapshot().result_visible());
}

#[tokio::test]
async fn test_tuple_result_rendered_as_json() {
    let log = new_log();
    let contract = Arc::new(
        MockContract::new(log.clone()).respond("getPair", Ok(vec![uint(1), uint(2)])),
    );
    let (context, _) = context_with(None, Some(contract));
    let dispatcher = Dispatcher::new(context);

    let result = dispatcher
        .submit("getPair", &FormValues::new().with("id", "9"))
        .await;

    assert_eq!(result.text(), r#"Pair ID: ["1","2"]"#);
}

#[tokio::test]
async fn test_unknown_operation_fails() {
    let (context, _) = context_with(None, Some(Arc::new(MockContract::new(new_log()))));
    let dispatcher = Dispatcher::new(context);

    let result = dispatcher.submit("selfDestruct", &FormValues::new()).await;

    assert_eq!(
        result.text(),
        "Transaction failed: unknown operation 'selfDestruct'"
    );
}

#[tokio::test]
async fn test_missing_contract_fails() {
    let (context, _) = context_with(None, None);
    let dispatcher = Dispatcher::new(context);

    let result = dispatcher.submit("schedule", &FormValues::new()).await;

    assert_eq!(result.text(), "Transaction failed: contract not loaded");
}

#[tokio::test]
async fn test_select_population_offers_periods() {
    let log = new_log();
    let contract = Arc::new(MockContract::new(log.clone()).with_schedule(Some(5)));
    let (context, _) = context_with(None, Some(contract));
    let dispatcher = Dispatcher::new(context.clone());

    dispatcher.select_operation("population").await;

    let session = context.snapshot();
    assert_eq!(session.selected_operation.as_deref(), Some("population"));
    assert!(session.submit_visible);
    assert_eq!(session.fields.len(), 1);
    let field = &session.fields[0];
    assert_eq!(field.value, "5");
    assert_eq!(field.selected_label(), Some("Current"));
    match &field.kind {
        FieldKind::Select(options) => {
            let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
            assert_eq!(values, vec!["4", "5", "6"]);
        }
        other => panic!("expected select, got {other:?}"),
    }
}

#[tokio::test]
async fn test_select_without_schedule_leaves_form_empty() {
    let log = new_log();
    let contract = Arc::new(MockContract::new(log.clone()).with_schedule(None));
    let (context, _) = context_with(None, Some(contract));
    let dispatcher = Dispatcher::new(context.clone());

    dispatcher.select_operation("nym").await;

    let session = context.snapshot();
    assert!(session.fields.is_empty());
    assert_eq!(session.message.unwrap().level, MessageLevel::Warning);
}

#[tokio::test]
async fn test_select_transfer_skips_schedule() {
    let log = new_log();
    let contract = Arc::new(MockContract::new(log.clone()));
    let (context, _) = context_with(None, Some(contract));
    let dispatcher = Dispatcher::new(context.clone());

    dispatcher.select_operation("transfer").await;

    let ids: Vec<String> = context
        .snapshot()
        .fields
        .iter()
        .map(|field| field.id.clone())
        .collect();
    assert_eq!(ids, vec!["token", "to", "value"]);
    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn test_empty_selection_clears_form() {
    let log = new_log();
    let contract = Arc::new(MockContract::new(log.clone()));
    let (context, _) = context_with(None, Some(contract));
    let dispatcher = Dispatcher::new(context.clone());

    dispatcher.select_operation("transfer").await;
    dispatcher.submit("schedule", &FormValues::new()).await;
    dispatcher.select_operation("").await;

    let session = context.snapshot();
    assert!(session.fields.is_empty());
    assert!(!session.submit_visible);
    assert!(!session.result_visible());
    assert!(session.selected_operation.is_none());
}
