use thiserror::Error;

use crate::template::OperationKind;

/// Errors detected while reading, parsing or validating a workload
/// configuration. All of them are fatal: there is no partial-success mode,
/// the artifact has to be fixed and the plan rebuilt from scratch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read the workload configuration")]
    SourceUnavailable(#[from] std::io::Error),

    #[error("the configuration needs a percentage header and at least one template line")]
    InsufficientInput,

    #[error("invalid header {line:?}: expected 3 numeric fields <percInsert> <percModify> <percSearch>")]
    MalformedHeader { line: String },

    #[error("operation kind percentages sum to {sum}, must be exactly 100.0")]
    PercentageSumMismatch { sum: f64 },

    #[error("invalid template line {line:?}: expected <I|M|S> <share> <attr1> [<attr2> ...]")]
    MalformedTemplateLine { line: String },

    #[error("invalid template share {token:?} in line {line:?}")]
    UnparseableShare { token: String, line: String },

    #[error("template shares for {kind} operations reach {reached}, must be exactly 100.0")]
    PartitionInvariantViolation { kind: OperationKind, reached: f64 },
}

/// A lookup against the constructed plan found no owning template.
/// Both variants mean "not found"; they are kept separate so the caller
/// can tell an unused kind from a draw outside the covered range.
#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("no templates are declared for {kind} operations")]
    NoTemplates { kind: OperationKind },

    #[error("draw {draw} exceeds the maximum roof {max_roof} for {kind} operations")]
    DrawBeyondMaxRoof {
        kind: OperationKind,
        draw: f64,
        max_roof: f64,
    },

    #[error("draw {draw} is outside the (0, 100] kind selection range")]
    KindDrawOutOfRange { draw: f64 },
}
