//! Form model: rendered fields, their values, and positional argument marshaling

use std::collections::BTreeMap;

use crate::domain::operations::{
    ArgSource, DefaultRule, FieldSpec, InputKind, OperationDescriptor, PeriodChoices,
    SelectSource, TOKEN_KINDS,
};
use crate::domain::preimage::{commitment_hash, random_preimage};
use crate::error::ContractCallError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Checkbox,
    Select(Vec<SelectOption>),
}

/// A field as rendered, holding its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: String,
    pub label: String,
    pub placeholder: String,
    pub kind: FieldKind,
    /// Text content, `"true"`/`"false"` for checkboxes, option value for selects
    pub value: String,
}

impl Field {
    pub fn is_checked(&self) -> bool {
        self.value == "true"
    }

    pub fn toggle(&mut self) {
        if self.kind == FieldKind::Checkbox {
            self.value = (!self.is_checked()).to_string();
        }
    }

    /// Move a select to the next or previous option, wrapping around
    pub fn cycle_option(&mut self, forward: bool) {
        let FieldKind::Select(options) = &self.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = options
            .iter()
            .position(|option| option.value == self.value)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        self.value = options[next].value.clone();
    }

    /// Label of the selected option, if this is a select
    pub fn selected_label(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Select(options) => options
                .iter()
                .find(|option| option.value == self.value)
                .map(|option| option.label.as_str()),
            _ => None,
        }
    }

    pub fn accepts_text(&self) -> bool {
        matches!(self.kind, FieldKind::Text | FieldKind::Number)
    }
}

/// Token selector options, value = token index
pub fn token_options() -> Vec<SelectOption> {
    TOKEN_KINDS
        .iter()
        .enumerate()
        .map(|(index, name)| SelectOption::new(*name, index.to_string()))
        .collect()
}

/// Period selector options around the current schedule index.
///
/// "Previous" is omitted while the schedule is still at period 0.
pub fn period_options(choices: PeriodChoices, current: u64) -> Vec<SelectOption> {
    let mut options = Vec::with_capacity(3);
    if choices.previous && current > 0 {
        options.push(SelectOption::new("Previous", (current - 1).to_string()));
    }
    if choices.current {
        options.push(SelectOption::new("Current", current.to_string()));
    }
    if choices.next {
        options.push(SelectOption::new("Next", current.saturating_add(1).to_string()));
    }
    options
}

fn render_field(spec: &FieldSpec, current_schedule: Option<u64>) -> Field {
    let kind = match spec.input {
        InputKind::Text => FieldKind::Text,
        InputKind::Number => FieldKind::Number,
        InputKind::Checkbox => FieldKind::Checkbox,
        InputKind::Select(SelectSource::Token) => FieldKind::Select(token_options()),
        InputKind::Select(SelectSource::Period(choices)) => FieldKind::Select(
            current_schedule
                .map(|current| period_options(choices, current))
                .unwrap_or_default(),
        ),
    };

    let value = match spec.default {
        DefaultRule::Empty if spec.input == InputKind::Checkbox => "false".to_string(),
        DefaultRule::Empty => String::new(),
        DefaultRule::RandomPreimage => random_preimage(),
        DefaultRule::FirstOption => match &kind {
            FieldKind::Select(options) => options
                .first()
                .map(|option| option.value.clone())
                .unwrap_or_default(),
            _ => String::new(),
        },
        DefaultRule::CurrentPeriod => current_schedule
            .map(|current| current.to_string())
            .unwrap_or_default(),
    };

    Field {
        id: spec.id.to_string(),
        label: spec.label.to_string(),
        placeholder: spec.placeholder.to_string(),
        kind,
        value,
    }
}

/// Render an operation's fields in declared order with their defaults.
///
/// `current_schedule` must be provided for operations with a period selector;
/// without it the selector renders with no options.
pub fn render_fields(op: &OperationDescriptor, current_schedule: Option<u64>) -> Vec<Field> {
    op.fields
        .iter()
        .map(|spec| render_field(spec, current_schedule))
        .collect()
}

/// Submitted field values, keyed by field id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: &[Field]) -> Self {
        let values = fields
            .iter()
            .map(|field| (field.id.clone(), field.value.clone()))
            .collect();
        Self { values }
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Result<&str, ContractCallError> {
        self.values
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| ContractCallError::MissingField(id.to_string()))
    }
}

/// Build the positional argument list for a submission.
///
/// Values are passed through untouched; only field presence is checked.
pub fn marshal_args(
    op: &OperationDescriptor,
    values: &FormValues,
    current_schedule: Option<u64>,
) -> Result<Vec<String>, ContractCallError> {
    op.args
        .iter()
        .map(|arg| match arg {
            ArgSource::Field(id) => values.get(id).map(str::to_string),
            ArgSource::Commitment(id) => values
                .get(id)
                .map(|v| format!("0x{}", hex::encode(commitment_hash(v)))),
            ArgSource::CurrentSchedule => current_schedule
                .map(|current| current.to_string())
                .ok_or(ContractCallError::ScheduleUnavailable),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operations::lookup;
    use crate::domain::preimage::PREIMAGE_LEN;

    #[test]
    fn test_period_options_all() {
        let options = period_options(PeriodChoices::ALL, 5);
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["4", "5", "6"]);
        assert_eq!(options[1].label, "Current");
    }

    #[test]
    fn test_period_options_omit_previous_at_zero() {
        let options = period_options(PeriodChoices::PAST, 0);
        assert_eq!(options, vec![SelectOption::new("Current", "0")]);
    }

    #[test]
    fn test_period_options_upcoming() {
        let options = period_options(PeriodChoices::UPCOMING, 3);
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Current", "Next"]);
    }

    #[test]
    fn test_render_transfer_fields() {
        let fields = render_fields(lookup("transfer").unwrap(), None);
        let ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["token", "to", "value"]);
        assert_eq!(fields[0].value, "0");
        assert_eq!(fields[0].selected_label(), Some("ProofOfUniqueHuman"));
        match &fields[0].kind {
            FieldKind::Select(options) => assert_eq!(options.len(), 4),
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn test_render_period_defaults_to_current() {
        let fields = render_fields(lookup("population").unwrap(), Some(7));
        assert_eq!(fields[0].id, "t");
        assert_eq!(fields[0].value, "7");
        assert_eq!(fields[0].selected_label(), Some("Current"));
    }

    #[test]
    fn test_render_register_prefills_preimage() {
        let op = lookup("register").unwrap();
        let first = render_fields(op, None);
        let second = render_fields(op, None);
        assert_eq!(first[0].value.len(), PREIMAGE_LEN);
        assert_ne!(first[0].value, second[0].value);
    }

    #[test]
    fn test_checkbox_toggle() {
        let mut fields = render_fields(lookup("dispute").unwrap(), None);
        assert!(!fields[0].is_checked());
        fields[0].toggle();
        assert!(fields[0].is_checked());
        assert_eq!(fields[0].value, "true");
    }

    #[test]
    fn test_cycle_option_wraps() {
        let mut fields = render_fields(lookup("transfer").unwrap(), None);
        fields[0].cycle_option(false);
        assert_eq!(fields[0].value, "3");
        fields[0].cycle_option(true);
        assert_eq!(fields[0].value, "0");
    }

    #[test]
    fn test_marshal_transfer_order() {
        let values = FormValues::new()
            .with("token", "1")
            .with("to", "0xABC")
            .with("value", "100");
        let args = marshal_args(lookup("transfer").unwrap(), &values, None).unwrap();
        assert_eq!(args, vec!["0xABC", "100", "1"]);
    }

    #[test]
    fn test_marshal_transfer_from_order() {
        let values = FormValues::new()
            .with("token", "2")
            .with("from", "0xF")
            .with("to", "0xT")
            .with("value", "9");
        let args = marshal_args(lookup("transferFrom").unwrap(), &values, None).unwrap();
        assert_eq!(args, vec!["2", "0xF", "0xT", "9"]);
    }

    #[test]
    fn test_marshal_current_schedule() {
        let values = FormValues::new().with("token", "0").with("account", "0xA");
        let op = lookup("balanceOf").unwrap();
        let args = marshal_args(op, &values, Some(12)).unwrap();
        assert_eq!(args, vec!["12", "0", "0xA"]);
        assert!(matches!(
            marshal_args(op, &values, None),
            Err(ContractCallError::ScheduleUnavailable)
        ));
    }

    #[test]
    fn test_marshal_register_sends_commitment() {
        let preimage = "ab".repeat(32);
        let values = FormValues::new().with("randomNumber", preimage.clone());
        let args = marshal_args(lookup("register").unwrap(), &values, None).unwrap();
        assert_eq!(args, vec![format!("0x{}", hex::encode(commitment_hash(&preimage)))]);
        assert!(args[0].starts_with("0x"));
        assert_eq!(args[0].len(), 66);
    }

    #[test]
    fn test_marshal_missing_field() {
        let values = FormValues::new().with("to", "0xABC");
        let err = marshal_args(lookup("transfer").unwrap(), &values, None).unwrap_err();
        assert!(matches!(err, ContractCallError::MissingField(ref id) if id == "value"));
    }

    #[test]
    fn test_marshal_reads_period_field() {
        for name in ["proofOfUniqueHuman", "shuffler", "commit"] {
            let values = FormValues::new().with("t", "4").with("account", "0xA");
            let args = marshal_args(lookup(name).unwrap(), &values, None).unwrap();
            assert_eq!(args, vec!["4", "0xA"], "{name}");
        }
    }
}
