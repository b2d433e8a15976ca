//! Instruction-set database consumed by the isa-codegen generators.

/// Database loading errors.
pub mod error;
pub use error::{DbError, DbResult};

/// Record types for instructions, operands, enumerations, rules, passes and intrinsics.
pub mod records;
pub use records::{
    Categorized, Enum, EnumValue, Instruction, Intrinsic, IntrinsicParam, Operand, Pass, PassArg,
    ValidationRule, DEFAULT_OPCODE_QUALIFIER,
};

/// Immutable database snapshot and lookups.
pub mod database;
pub use database::{Database, DatabaseContents};
