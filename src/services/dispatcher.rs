//! Function dispatcher: operation selection, form rendering, and submission

use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;

use crate::core::{SessionContext, SubmissionResult};
use crate::domain::form::{marshal_args, render_fields, FormValues};
use crate::domain::operations::{lookup, InvocationKind, OperationDescriptor, SCHEDULE_METHOD};
use crate::error::ContractCallError;
use crate::infrastructure::abi::format_output;
use crate::infrastructure::contract::TxOptions;

pub struct Dispatcher {
    context: Arc<SessionContext>,
}

impl Dispatcher {
    pub fn new(context: Arc<SessionContext>) -> Self {
        Self { context }
    }

    /// Replace the form with the fields of `name`. An empty name clears the
    /// form and hides the submit control.
    pub async fn select_operation(&self, name: &str) {
        self.context.update(|session| {
            session.clear_form();
            session.selected_operation = None;
        });
        if name.is_empty() {
            return;
        }

        let Some(op) = lookup(name) else {
            tracing::warn!(operation = name, "unknown operation selected");
            let err = ContractCallError::UnknownOperation(name.into());
            self.context.update(|session| session.warn(err.to_string()));
            return;
        };

        self.context.update(|session| {
            session.selected_operation = Some(op.name.to_string());
            session.submit_visible = true;
        });

        let schedule = if op.needs_schedule_for_render() {
            match self.current_schedule().await {
                Ok(current) => Some(current),
                Err(err) => {
                    tracing::warn!(operation = op.name, %err, "schedule read failed");
                    self.context.update(|session| {
                        session.warn(format!("Could not read the current schedule: {}", err))
                    });
                    return;
                }
            }
        } else {
            None
        };

        let fields = render_fields(op, schedule);
        self.context.update(|session| {
            // A later selection wins
            if session.selected_operation.as_deref() == Some(op.name) {
                session.fields = fields;
                session.form_revision = session.form_revision.wrapping_add(1);
            }
        });
    }

    /// Invoke `name` with the submitted values and show the outcome
    pub async fn submit(&self, name: &str, values: &FormValues) -> SubmissionResult {
        let result = match self.invoke(name, values).await {
            Ok(text) => SubmissionResult::Success(text),
            Err(err) => {
                tracing::error!(operation = name, %err, "submission failed");
                SubmissionResult::Failure(format!("Transaction failed: {}", err))
            }
        };
        self.context
            .update(|session| session.result = Some(result.clone()));
        result
    }

    async fn invoke(&self, name: &str, values: &FormValues) -> Result<String, ContractCallError> {
        let op = lookup(name).ok_or_else(|| ContractCallError::UnknownOperation(name.into()))?;
        let schedule = if op.needs_schedule_for_submit() {
            Some(self.current_schedule().await?)
        } else {
            None
        };
        let args = marshal_args(op, values, schedule)?;
        tracing::debug!(operation = op.name, ?args, "submitting");

        match op.kind {
            InvocationKind::Send => self.send(op, &args).await,
            InvocationKind::Call => {
                let contract = self.context.contract()?;
                let outputs = contract.call(op.name, &args).await?;
                Ok(format!("{}: {}", op.label, format_output(&outputs)))
            }
        }
    }

    /// Sender first, then a fresh gas price, then the transaction
    async fn send(
        &self,
        op: &OperationDescriptor,
        args: &[String],
    ) -> Result<String, ContractCallError> {
        let contract = self.context.contract()?;
        let wallet = self.context.wallet()?;

        let from = wallet
            .accounts()
            .await?
            .first()
            .copied()
            .ok_or(ContractCallError::NoSender)?;
        let gas_price = wallet.gas_price().await?;

        let tx_hash = contract
            .send(op.name, args, TxOptions { from, gas_price })
            .await?;
        tracing::info!(operation = op.name, %from, %tx_hash, "transaction mined");
        Ok(format!("Transaction successful for {}!", op.label))
    }

    /// Current schedule index, read fresh from the contract
    async fn current_schedule(&self) -> Result<u64, ContractCallError> {
        let contract = self.context.contract()?;
        let outputs = contract.call(SCHEDULE_METHOD, &[]).await?;
        match outputs.first() {
            Some(DynSolValue::Uint(value, _)) => u64::try_from(*value)
                .map_err(|_| ContractCallError::Abi(format!("schedule {} out of range", value))),
            other => Err(ContractCallError::Abi(format!(
                "unexpected schedule output {:?}",
                other
            ))),
        }
    }
}
