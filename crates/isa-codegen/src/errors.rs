//! Generator failure taxonomy.
//!
//! Every variant aborts the current generator invocation. Generation is
//! deterministic, so none of these are retried.

use isa_db::DbError;
use thiserror::Error;

/// Failure rendering an artifact.
#[derive(Debug, Error)]
pub enum GenError {
    /// An operand type has no rendering rule in the active generator.
    #[error("don't know how to describe type {ty} for operand {operand}")]
    UnsupportedType {
        /// The unrecognized type code.
        ty: String,
        /// Operand (or instruction) that carries it.
        operand: String,
    },
    /// A function attribute code has no rendering rule.
    #[error("unknown function attribute '{attr}' on instruction {instruction}")]
    UnsupportedAttribute {
        /// The unrecognized attribute code.
        attr: String,
        /// Instruction carrying it.
        instruction: String,
    },
    /// A range test was requested over an empty id set.
    #[error("cannot build a range condition for '{var}' from an empty set")]
    EmptyRange {
        /// Variable the condition would test.
        var: String,
    },
    /// A table was rendered without any rows.
    #[error("cannot format an empty table")]
    EmptyTable,
    /// A table row does not match the header's column count.
    #[error("table row {row} has {found} columns, expected {expected}")]
    RaggedTable {
        /// Zero-based row index.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// A generator needs at least one record of some kind.
    #[error("no {0} available to generate from")]
    EmptySelection(&'static str),
    /// A table row names an enumerator that does not exist.
    #[error("enumeration {enumeration} has no value named '{value}'")]
    UnknownEnumValue {
        /// Enumeration searched.
        enumeration: String,
        /// Missing value name.
        value: String,
    },
    /// An instruction predicate or attribute name is not recognized.
    #[error("unknown instruction {kind} '{name}'")]
    UnknownPredicate {
        /// `predicate` or `attribute`.
        kind: &'static str,
        /// The unrecognized name.
        name: String,
    },
    /// A shader-model gated instruction lists no shader stages.
    #[error("instruction {instruction} has an empty shader model list")]
    EmptyShaderModels {
        /// Name of the first instruction in the offending group.
        instruction: String,
    },
    /// Database lookup failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result alias for generator operations.
pub type GenResult<T> = Result<T, GenError>;
