//! Source and documentation generators driven by an instruction-set database.

use tracing_subscriber as _;

/// Line-oriented output buffer and banner helpers.
pub mod srcgen;

/// Generator error types.
pub mod errors;
pub use errors::{GenError, GenResult};

/// Compression of id sets into range conditions.
pub mod ranges;
/// Wrapped comments and reStructuredText tables.
pub mod layout;
/// Column-aligned X-macro tables.
pub mod macro_table;
/// Category ordering and grouping.
pub mod ordering;

/// HTML reference documentation.
pub mod docs_ref;
/// C++ instruction helper structs.
pub mod instr_helper;
/// Enumeration declarations and validation-rule messages.
pub mod enums;
/// Opcode property, overload and signature tables.
pub mod overloads;
/// Validator dispatch code.
pub mod validation;
/// reStructuredText tables for the DXIL reference document.
pub mod rst;
/// Signature point X-macro tables.
pub mod sigpoints;
/// Optimizer pass registry fragments.
pub mod passes;
/// HLSL intrinsic tables and enumerators.
pub mod intrinsics;

/// Named whole-file generators and region artifacts.
pub mod artifact;
pub use artifact::{Artifact, GenKind};
/// Tagged-region updater.
pub mod codetags;
pub use codetags::{
    update_file, update_text, update_tree, CodeTagError, UpdateOutcome, DEFAULT_UPDATE_TARGETS,
};
