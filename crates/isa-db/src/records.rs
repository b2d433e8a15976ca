//! Record types for every database entity.
//!
//! All records are plain data. Text fields use the empty string for "absent"
//! (no category, no documentation, no enum reference) so every field is
//! always present.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default qualifier prepended to DXIL opcode names in generated C++.
pub const DEFAULT_OPCODE_QUALIFIER: &str = "hlsl::OP::OpCode";

/// Records that can be listed under a category heading.
pub trait Categorized {
    /// Category name; empty when uncategorized.
    fn category(&self) -> &str;
    /// Record name, unique within its table.
    fn name(&self) -> &str;
}

/// A single instruction: either a DXIL operation or an allowed/disallowed
/// LLVM instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Instruction {
    /// Instruction name, e.g. `TempRegLoad` or `Add`.
    pub name: String,
    /// Grouping category for documentation and tables.
    pub category: String,
    /// DXIL opcode id (meaningful when `is_dxil_op`).
    pub dxil_opid: u32,
    /// LLVM opcode id (meaningful for LLVM instructions).
    pub llvm_id: u32,
    /// Opcode name used in the opcode reference table.
    pub dxil_op: String,
    /// Opcode class name.
    pub dxil_class: String,
    /// Operands; position 0 is the result and position 1 the opcode.
    pub ops: Vec<Operand>,
    /// One-line description completing "This instruction ...".
    pub doc: String,
    /// Longer reStructuredText remarks.
    pub remarks: String,
    /// Overload letters: `v h f d 1 8 w i l`.
    pub oload_types: String,
    /// Function attribute code: `""`, `"ro"` or `"rn"`.
    pub fn_attr: String,
    /// True for DXIL operations (calls to `dx.op.*`).
    pub is_dxil_op: bool,
    /// Reserved slots produce no helper code.
    pub is_reserved: bool,
    /// Whether the validator accepts this instruction.
    pub is_allowed: bool,
    /// Overrides the helper struct prefix when non-empty.
    pub inst_helper_prefix: String,
    /// Shader stage letters this opcode is valid in; `*` means all stages.
    pub shader_models: String,
    /// Qualifier used by [`Instruction::fully_qualified_name`].
    pub fully_qualified_name_prefix: String,
}

impl Default for Instruction {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            dxil_opid: 0,
            llvm_id: 0,
            dxil_op: String::new(),
            dxil_class: String::new(),
            ops: Vec::new(),
            doc: String::new(),
            remarks: String::new(),
            oload_types: String::new(),
            fn_attr: String::new(),
            is_dxil_op: false,
            is_reserved: false,
            is_allowed: false,
            inst_helper_prefix: String::new(),
            shader_models: String::from("*"),
            fully_qualified_name_prefix: String::from(DEFAULT_OPCODE_QUALIFIER),
        }
    }
}

impl Instruction {
    /// Name qualified for use as a C++ enumerator, e.g. `hlsl::OP::OpCode::Sin`.
    #[must_use]
    pub fn fully_qualified_name(&self) -> String {
        format!("{}::{}", self.fully_qualified_name_prefix, self.name)
    }

    /// Returns true if `letter` appears in the overload type string.
    #[must_use]
    pub fn has_overload(&self, letter: char) -> bool {
        self.oload_types.contains(letter)
    }
}

impl Categorized for Instruction {
    fn category(&self) -> &str {
        &self.category
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A positional operand slot of an instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Operand {
    /// Position: 0 result, 1 opcode, 2.. arguments.
    pub pos: u32,
    /// Operand name used for accessors.
    pub name: String,
    /// Type code, e.g. `i32`, `$o`, `res`.
    pub llvm_type: String,
    /// Documentation.
    pub doc: String,
    /// Operand must be an immediate constant.
    pub is_const: bool,
    /// Enumeration the operand draws values from; empty when none.
    pub enum_name: String,
}

impl Operand {
    /// Zero-based argument index of this operand in the underlying call.
    #[must_use]
    pub const fn call_operand_index(&self) -> u32 {
        self.pos.saturating_sub(1)
    }
}

/// A named enumeration with its ordered values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Enum {
    /// Enumeration name.
    pub name: String,
    /// Documentation line.
    pub doc: String,
    /// Values in declaration order.
    pub values: Vec<EnumValue>,
    /// Internal enumerations are declared without explicit values.
    pub is_internal: bool,
}

impl Enum {
    /// Value names in declaration order.
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.name.as_str())
    }

    /// Finds a value by name.
    #[must_use]
    pub fn value_named(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// A single enumerator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnumValue {
    /// Enumerator name.
    pub name: String,
    /// Numeric value.
    pub value: i64,
    /// Documentation line.
    pub doc: String,
    /// Grouping category.
    pub category: String,
    /// Diagnostic text (validation-rule enumerators only).
    pub err_msg: String,
}

impl Categorized for EnumValue {
    fn category(&self) -> &str {
        &self.category
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A named validation rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidationRule {
    /// Rule code, e.g. `INSTR.OPCONST`.
    pub name: String,
    /// Grouping category.
    pub category: String,
    /// Description of the constraint.
    pub doc: String,
    /// Diagnostic message template.
    pub err_msg: String,
    /// Disabled rules are left out of published tables.
    pub is_disabled: bool,
}

impl Categorized for ValidationRule {
    fn category(&self) -> &str {
        &self.category
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// An optimizer pass exposed through the compiler's pass registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pass {
    /// Command-line pass name.
    pub name: String,
    /// Type name used to build `initialize<Type>Pass`.
    pub type_name: String,
    /// Documentation.
    pub doc: String,
    /// Pass arguments.
    pub args: Vec<PassArg>,
}

/// A named pass argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PassArg {
    /// Option name.
    pub name: String,
    /// Option description.
    pub doc: String,
}

/// A high-level language intrinsic function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Intrinsic {
    /// Function name.
    pub name: String,
    /// Namespace table the intrinsic belongs to, e.g. `Intrinsics`.
    pub ns: String,
    /// Sort key; intrinsics are emitted in key order.
    pub key: String,
    /// `IntrinsicOp` enumerator name.
    pub enum_name: String,
    /// Enumerator of the unsigned variant; empty when none.
    pub unsigned_op: String,
    /// Function only reads memory.
    pub readonly: bool,
    /// Function does not touch memory.
    pub readnone: bool,
    /// Parameter index that drives overload selection.
    pub overload_param_index: i32,
    /// Parameters; index 0 describes the return value.
    pub params: Vec<IntrinsicParam>,
}

/// One intrinsic parameter; type fields are emitted verbatim as C expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(missing_docs)]
pub struct IntrinsicParam {
    pub name: String,
    pub param_qual: String,
    pub template_id: String,
    pub template_list: String,
    pub component_id: String,
    pub component_list: String,
    pub rows: String,
    pub cols: String,
}
