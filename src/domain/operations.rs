//! Static table of contract operations
//!
//! One entry per supported contract function. The form renderer and the
//! submit handler both read from this table, so the set of fields an
//! operation shows and the arguments it sends can never drift apart.

/// How an operation reaches the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    /// Side-effect-free `eth_call`
    Call,
    /// Signed transaction through the wallet
    Send,
}

/// Which periods a period selector offers, relative to the current schedule index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodChoices {
    pub previous: bool,
    pub current: bool,
    pub next: bool,
}

impl PeriodChoices {
    pub const ALL: Self = Self {
        previous: true,
        current: true,
        next: true,
    };
    pub const PAST: Self = Self {
        previous: true,
        current: true,
        next: false,
    };
    pub const UPCOMING: Self = Self {
        previous: false,
        current: true,
        next: true,
    };
}

/// Where the options of a select field come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectSource {
    /// The four token kinds of the contract
    Token,
    /// Periods around the contract's current schedule index
    Period(PeriodChoices),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Checkbox,
    Select(SelectSource),
}

/// Initial value of a field when the form is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRule {
    Empty,
    /// Fresh random preimage on every render
    RandomPreimage,
    /// First option of a select
    FirstOption,
    /// The current period of a period selector
    CurrentPeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub input: InputKind,
    pub default: DefaultRule,
}

/// Source of one positional contract argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSource {
    /// Value of the field with this id
    Field(&'static str),
    /// Schedule index read from the contract at submit time
    CurrentSchedule,
    /// keccak256 commitment of the field with this id
    Commitment(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Contract function name
    pub name: &'static str,
    /// Human label used in the success text (sends) or result prefix (calls)
    pub label: &'static str,
    pub kind: InvocationKind,
    pub fields: &'static [FieldSpec],
    /// Arguments in the order the contract declares them
    pub args: &'static [ArgSource],
}

impl OperationDescriptor {
    pub fn is_mutation(&self) -> bool {
        self.kind == InvocationKind::Send
    }

    /// Whether rendering the form needs the current schedule index
    pub fn needs_schedule_for_render(&self) -> bool {
        self.fields
            .iter()
            .any(|field| matches!(field.input, InputKind::Select(SelectSource::Period(_))))
    }

    /// Whether submitting needs the current schedule index
    pub fn needs_schedule_for_submit(&self) -> bool {
        self.args.contains(&ArgSource::CurrentSchedule)
    }

    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.id == id)
    }
}

/// Token kinds, indexed by the value the contract expects
pub const TOKEN_KINDS: [&str; 4] = ["ProofOfUniqueHuman", "Register", "OptIn", "BorderVote"];

/// Name of the read that yields the current schedule index
pub const SCHEDULE_METHOD: &str = "schedule";

const TOKEN: FieldSpec = FieldSpec {
    id: "token",
    label: "Select Token",
    placeholder: "",
    input: InputKind::Select(SelectSource::Token),
    default: DefaultRule::FirstOption,
};

const fn period(choices: PeriodChoices) -> FieldSpec {
    FieldSpec {
        id: "t",
        label: "Select Period",
        placeholder: "",
        input: InputKind::Select(SelectSource::Period(choices)),
        default: DefaultRule::CurrentPeriod,
    }
}

const fn text(id: &'static str, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        label,
        placeholder,
        input: InputKind::Text,
        default: DefaultRule::Empty,
    }
}

const fn checkbox(label: &'static str) -> FieldSpec {
    FieldSpec {
        id: "early",
        label,
        placeholder: "",
        input: InputKind::Checkbox,
        default: DefaultRule::Empty,
    }
}

const PREIMAGE_SEED: FieldSpec = FieldSpec {
    id: "randomNumber",
    label: "Random Number (preimage)",
    placeholder: "Enter random number",
    input: InputKind::Text,
    default: DefaultRule::RandomPreimage,
};

const PAIR_ID: FieldSpec = FieldSpec {
    id: "id",
    label: "ID",
    placeholder: "Enter pair ID (uint256)",
    input: InputKind::Number,
    default: DefaultRule::Empty,
};

const TO: FieldSpec = text("to", "Recipient Address", "Enter recipient address");
const FROM: FieldSpec = text("from", "From Address", "Enter sender address");
const VALUE: FieldSpec = text("value", "Value", "Enter value (uint256)");
const ACCOUNT: FieldSpec = text("account", "Account", "Enter account address");
const PREIMAGE: FieldSpec = text("preimage", "Preimage", "Enter hash preimage");
const TARGET: FieldSpec = text("target", "Target", "Enter target");
const SPENDER: FieldSpec = text("spender", "Spender", "Enter spender address");
const OWNER: FieldSpec = text("owner", "Owner Address", "Enter owner address");
const ALLOWED_SPENDER: FieldSpec = text("spender", "Spender Address", "Enter spender address");
const NYM_ID: FieldSpec = text("id", "Nym ID", "Enter ID");
const REGISTRY_ID: FieldSpec = text("id", "Registry ID", "Enter ID");
const EARLY_DISPUTE: FieldSpec = checkbox("Early Dispute?");
const EARLY_REASSIGN: FieldSpec = checkbox("Early Reassign?");

const PERIOD_ALL: FieldSpec = period(PeriodChoices::ALL);
const PERIOD_PAST: FieldSpec = period(PeriodChoices::PAST);
const PERIOD_UPCOMING: FieldSpec = period(PeriodChoices::UPCOMING);

const fn send(
    name: &'static str,
    label: &'static str,
    fields: &'static [FieldSpec],
    args: &'static [ArgSource],
) -> OperationDescriptor {
    OperationDescriptor {
        name,
        label,
        kind: InvocationKind::Send,
        fields,
        args,
    }
}

const fn call(
    name: &'static str,
    label: &'static str,
    fields: &'static [FieldSpec],
    args: &'static [ArgSource],
) -> OperationDescriptor {
    OperationDescriptor {
        name,
        label,
        kind: InvocationKind::Call,
        fields,
        args,
    }
}

use ArgSource::{Commitment, CurrentSchedule, Field};

/// Every operation the console offers, in menu order
pub static OPERATIONS: &[OperationDescriptor] = &[
    // Mutations
    send("register", "Register", &[PREIMAGE_SEED], &[Commitment("randomNumber")]),
    send("optIn", "Opt In", &[], &[]),
    send("shuffle", "Shuffle", &[], &[]),
    send("lateShuffle", "Late Shuffle", &[], &[]),
    send("verify", "Verify", &[], &[]),
    send("nymVerified", "Nym Verified", &[], &[]),
    send("courtVerified", "Court Verified", &[], &[]),
    send("revealHash", "Reveal Hash", &[PREIMAGE], &[Field("preimage")]),
    send("claimProofOfUniqueHuman", "Claim Proof-Of-Unique-Human", &[], &[]),
    send("dispute", "Dispute", &[EARLY_DISPUTE], &[Field("early")]),
    send("reassignNym", "Reassign Nym", &[EARLY_REASSIGN], &[Field("early")]),
    send("reassignCourt", "Reassign Court", &[EARLY_REASSIGN], &[Field("early")]),
    send("borderVote", "Border Vote", &[TARGET], &[Field("target")]),
    send(
        "transfer",
        "Transfer",
        &[TOKEN, TO, VALUE],
        &[Field("to"), Field("value"), Field("token")],
    ),
    send(
        "approve",
        "Approve",
        &[TOKEN, SPENDER, VALUE],
        &[Field("spender"), Field("value"), Field("token")],
    ),
    send(
        "transferFrom",
        "Transfer From",
        &[TOKEN, FROM, TO, VALUE],
        &[Field("token"), Field("from"), Field("to"), Field("value")],
    ),
    // Queries
    call(
        "balanceOf",
        "Balance",
        &[TOKEN, ACCOUNT],
        &[CurrentSchedule, Field("token"), Field("account")],
    ),
    call(
        "allowance",
        "Allowance",
        &[TOKEN, OWNER, ALLOWED_SPENDER],
        &[CurrentSchedule, Field("token"), Field("owner"), Field("spender")],
    ),
    call(
        "proofOfUniqueHuman",
        "Proof Of Unique Human",
        &[PERIOD_ALL, ACCOUNT],
        &[Field("t"), Field("account")],
    ),
    call("population", "Population", &[PERIOD_ALL], &[Field("t")]),
    call("getPair", "Pair ID", &[NYM_ID], &[Field("id")]),
    call("nym", "Nym Result", &[PERIOD_PAST, ACCOUNT], &[Field("t"), Field("account")]),
    call(
        "shuffler",
        "Is Shuffler",
        &[PERIOD_PAST, ACCOUNT],
        &[Field("t"), Field("account")],
    ),
    call("court", "Court Result", &[PERIOD_PAST, ACCOUNT], &[Field("t"), Field("account")]),
    call("commit", "Commit", &[PERIOD_PAST, ACCOUNT], &[Field("t"), Field("account")]),
    call(
        "registry",
        "Registry Address",
        &[PERIOD_PAST, REGISTRY_ID],
        &[Field("t"), Field("id")],
    ),
    call("registryLength", "Registry Length", &[PERIOD_PAST], &[Field("t")]),
    call("shuffled", "Shuffled", &[PERIOD_PAST], &[Field("t")]),
    call("courts", "Courts", &[PERIOD_PAST], &[Field("t")]),
    call("permits", "Permits", &[PERIOD_PAST], &[Field("t")]),
    call("seed", "Seed", &[PERIOD_PAST], &[Field("t")]),
    call("pair", "Pair", &[PERIOD_PAST, PAIR_ID], &[Field("t"), Field("id")]),
    call(SCHEDULE_METHOD, "Schedule", &[], &[]),
    call("toSeconds", "To Seconds", &[PERIOD_UPCOMING], &[Field("t")]),
    call("quarter", "Quarter", &[], &[CurrentSchedule]),
    call("hour", "Hour", &[PERIOD_UPCOMING], &[Field("t")]),
    call("pseudonymEvent", "Pseudonym Event", &[PERIOD_UPCOMING], &[Field("t")]),
];

/// Look up an operation by its contract function name
pub fn lookup(name: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS.iter().find(|op| op.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_names_are_unique() {
        let names: BTreeSet<&str> = OPERATIONS.iter().map(|op| op.name).collect();
        assert_eq!(names.len(), OPERATIONS.len());
    }

    #[test]
    fn test_every_field_arg_is_rendered() {
        for op in OPERATIONS {
            for arg in op.args {
                match arg {
                    ArgSource::Field(id) | ArgSource::Commitment(id) => assert!(
                        op.field(id).is_some(),
                        "{} reads field '{}' it never renders",
                        op.name,
                        id
                    ),
                    ArgSource::CurrentSchedule => {}
                }
            }
        }
    }

    #[test]
    fn test_every_rendered_field_is_sent() {
        for op in OPERATIONS {
            for field in op.fields {
                let used = op.args.iter().any(|arg| match arg {
                    ArgSource::Field(id) | ArgSource::Commitment(id) => *id == field.id,
                    ArgSource::CurrentSchedule => false,
                });
                assert!(used, "{} renders '{}' but never sends it", op.name, field.id);
            }
        }
    }

    #[test]
    fn test_token_operations_start_with_token_selector() {
        for name in ["transfer", "approve", "transferFrom", "balanceOf", "allowance"] {
            let op = lookup(name).unwrap();
            assert_eq!(op.fields[0].id, "token", "{name}");
        }
    }

    #[test]
    fn test_checkbox_operations() {
        for name in ["dispute", "reassignNym", "reassignCourt"] {
            let op = lookup(name).unwrap();
            assert_eq!(op.fields.len(), 1);
            assert_eq!(op.fields[0].input, InputKind::Checkbox);
            assert!(op.is_mutation());
        }
    }

    #[test]
    fn test_argument_order_follows_contract() {
        assert_eq!(
            lookup("transfer").unwrap().args,
            &[Field("to"), Field("value"), Field("token")]
        );
        assert_eq!(
            lookup("transferFrom").unwrap().args,
            &[Field("token"), Field("from"), Field("to"), Field("value")]
        );
    }

    #[test]
    fn test_schedule_needs() {
        assert!(lookup("population").unwrap().needs_schedule_for_render());
        assert!(!lookup("population").unwrap().needs_schedule_for_submit());
        assert!(lookup("quarter").unwrap().needs_schedule_for_submit());
        assert!(!lookup("transfer").unwrap().needs_schedule_for_render());
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("selfdestruct").is_none());
    }
}
