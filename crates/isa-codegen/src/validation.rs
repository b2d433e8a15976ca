//! Validator dispatch code: allowed-instruction tests, predicate range checks
//! and per-shader-model opcode gating.

use std::str::FromStr;

use isa_db::{Database, Instruction};
use tracing::debug;

use crate::errors::{GenError, GenResult};
use crate::fmtln;
use crate::layout::format_comment;
use crate::ranges::range_condition;
use crate::srcgen::{banner_line, banner_rule, Formatter};

/// Shader-model string meaning "valid in every stage".
pub const ALL_SHADER_MODELS: &str = "*";

/// Boolean instruction flag usable as a selection predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrFlag {
    /// `is_dxil_op`
    DxilOp,
    /// `is_allowed`
    Allowed,
    /// `is_reserved`
    Reserved,
}

impl InstrFlag {
    /// Evaluates the flag on `instr`.
    #[must_use]
    pub const fn test(self, instr: &Instruction) -> bool {
        match self {
            Self::DxilOp => instr.is_dxil_op,
            Self::Allowed => instr.is_allowed,
            Self::Reserved => instr.is_reserved,
        }
    }
}

impl FromStr for InstrFlag {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "is_dxil_op" => Ok(Self::DxilOp),
            "is_allowed" => Ok(Self::Allowed),
            "is_reserved" => Ok(Self::Reserved),
            other => Err(GenError::UnknownPredicate {
                kind: "predicate",
                name: other.to_string(),
            }),
        }
    }
}

/// Numeric id attribute used in range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdAttr {
    /// `dxil_opid`
    #[default]
    DxilOpid,
    /// `llvm_id`
    LlvmId,
}

impl IdAttr {
    /// Reads the attribute from `instr`.
    #[must_use]
    pub const fn get(self, instr: &Instruction) -> u32 {
        match self {
            Self::DxilOpid => instr.dxil_opid,
            Self::LlvmId => instr.llvm_id,
        }
    }
}

impl FromStr for IdAttr {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dxil_opid" => Ok(Self::DxilOpid),
            "llvm_id" => Ok(Self::LlvmId),
            other => Err(GenError::UnknownPredicate {
                kind: "attribute",
                name: other.to_string(),
            }),
        }
    }
}

fn id_listing(label: &str, instrs: &[&Instruction], attr: IdAttr) -> String {
    let pairs = instrs
        .iter()
        .map(|i| format!("{}={}", i.name, attr.get(i)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{label}: {pairs}")
}

fn allowed_llvm_instrs(db: &Database) -> Vec<&Instruction> {
    db.instructions()
        .iter()
        .filter(|i| i.is_allowed && !i.is_dxil_op)
        .collect()
}

/// Renders `IsLLVMInstructionAllowed` with its banner.
///
/// # Errors
///
/// Returns [`GenError::EmptyRange`] if no LLVM instruction is allowed.
pub fn validation_functions(db: &Database) -> GenResult<String> {
    let instrs = allowed_llvm_instrs(db);
    debug!(allowed = instrs.len(), "rendering validation functions");
    let condition = range_condition("op", instrs.iter().map(|i| i.llvm_id))?;

    let mut fmt = Formatter::new();
    fmt.line(banner_rule());
    fmt.line(banner_line("Instruction validation functions."));
    fmt.line("static bool IsLLVMInstructionAllowed(llvm::Instruction &I) {");
    fmt.push_str(&format_comment(
        "  // ",
        &id_listing("Allow", &instrs, IdAttr::LlvmId),
    ));
    fmt.line("  unsigned op = I.getOpcode();");
    fmtln!(fmt, "  return {condition};");
    fmt.line("}");
    fmt.empty_line();
    Ok(fmt.finish())
}

/// Renders a commented `return <range test>;` over instructions matching
/// `flag`, keyed by `attr`.
///
/// # Errors
///
/// Returns [`GenError::EmptyRange`] if nothing matches.
pub fn instrs_pred(db: &Database, var: &str, flag: InstrFlag, attr: IdAttr) -> GenResult<String> {
    let instrs: Vec<&Instruction> = db.instructions().iter().filter(|i| flag.test(i)).collect();
    let condition = range_condition(var, instrs.iter().map(|i| attr.get(i)))?;
    let mut out = format_comment("// ", &id_listing("Instructions", &instrs, attr));
    out.push_str(&format!("return {condition};\n"));
    Ok(out)
}

/// Disjunction of `pSM->Is?S()` calls for each stage letter.
fn shader_model_test(models: &str) -> String {
    models
        .chars()
        .map(|stage| format!("pSM->Is{}S()", stage.to_ascii_uppercase()))
        .collect::<Vec<_>>()
        .join(" || ")
}

/// Renders the per-shader-model opcode gate used by the validator.
///
/// Opcodes valid everywhere (`*`) fall through to the final `return true;`.
///
/// # Errors
///
/// Returns [`GenError::EmptyShaderModels`] when a DXIL op has an empty
/// shader model string.
pub fn valopcode_sm_text(db: &Database) -> GenResult<String> {
    let mut instrs: Vec<&Instruction> = db.instructions().iter().filter(|i| i.is_dxil_op).collect();
    instrs.sort_by(|a, b| (&a.shader_models, a.dxil_opid).cmp(&(&b.shader_models, b.dxil_opid)));

    let mut out = String::new();
    for group in instrs.chunk_by(|a, b| a.shader_models == b.shader_models) {
        let models = group[0].shader_models.as_str();
        if models == ALL_SHADER_MODELS {
            continue;
        }
        if models.is_empty() {
            return Err(GenError::EmptyShaderModels {
                instruction: group[0].name.clone(),
            });
        }
        out.push_str(&format_comment(
            "// ",
            &id_listing("Instructions", group, IdAttr::DxilOpid),
        ));
        let condition = range_condition("op", group.iter().map(|i| i.dxil_opid))?;
        out.push_str(&format!("if ({condition})\n"));
        out.push_str(&format!("  return {};\n", shader_model_test(models)));
    }
    out.push_str("return true;\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use isa_db::DatabaseContents;
    use rstest::rstest;

    use super::*;

    fn llvm(name: &str, id: u32, allowed: bool) -> Instruction {
        Instruction {
            name: name.to_string(),
            llvm_id: id,
            is_allowed: allowed,
            ..Instruction::default()
        }
    }

    fn dxil(name: &str, id: u32, models: &str) -> Instruction {
        Instruction {
            name: name.to_string(),
            dxil_opid: id,
            is_dxil_op: true,
            is_allowed: true,
            shader_models: models.to_string(),
            ..Instruction::default()
        }
    }

    fn db(instructions: Vec<Instruction>) -> Database {
        Database::new(DatabaseContents {
            instructions,
            ..DatabaseContents::default()
        })
        .unwrap()
    }

    #[test]
    fn allowed_llvm_instructions_become_range_test() {
        let text = validation_functions(&db(vec![
            llvm("Ret", 1, true),
            llvm("Br", 2, true),
            llvm("Switch", 3, false),
            llvm("Add", 8, true),
            dxil("Sin", 13, "*"),
        ]))
        .unwrap();
        assert!(text.contains(
            "static bool IsLLVMInstructionAllowed(llvm::Instruction &I) {\n  \
             // Allow: Ret=1, Br=2, Add=8\n  \
             unsigned op = I.getOpcode();\n  \
             return 1 <= op && op <= 2 || op == 8;\n\
             }\n\n"
        ));
        assert!(text.starts_with(&banner_rule()));
    }

    #[test]
    fn no_allowed_instructions_is_an_error() {
        let err = validation_functions(&db(vec![llvm("Ret", 1, false)])).unwrap_err();
        assert!(matches!(err, GenError::EmptyRange { .. }));
    }

    #[test]
    fn predicate_selects_by_flag_and_attribute() {
        let text = instrs_pred(
            &db(vec![dxil("Sin", 13, "*"), dxil("Cos", 12, "*"), llvm("Ret", 1, true)]),
            "op",
            InstrFlag::DxilOp,
            IdAttr::DxilOpid,
        )
        .unwrap();
        assert_eq!(
            text,
            "// Instructions: Sin=13, Cos=12\nreturn 12 <= op && op <= 13;\n"
        );
    }

    #[rstest]
    #[case("is_dxil_op", Ok(InstrFlag::DxilOp))]
    #[case("is_allowed", Ok(InstrFlag::Allowed))]
    #[case("is_reserved", Ok(InstrFlag::Reserved))]
    #[case("is_gradient", Err(()))]
    fn flag_names_parse(#[case] name: &str, #[case] expected: Result<InstrFlag, ()>) {
        assert_eq!(name.parse::<InstrFlag>().map_err(|_| ()), expected);
    }

    #[test]
    fn attribute_names_parse() {
        assert_eq!("llvm_id".parse::<IdAttr>().unwrap(), IdAttr::LlvmId);
        assert_eq!("dxil_opid".parse::<IdAttr>().unwrap(), IdAttr::DxilOpid);
        assert!("opcode".parse::<IdAttr>().is_err());
    }

    #[test]
    fn shader_model_gate_groups_by_model() {
        let text = valopcode_sm_text(&db(vec![
            dxil("Sin", 13, "*"),
            dxil("Discard", 82, "p"),
            dxil("DerivCoarseX", 83, "p"),
            dxil("EmitStream", 97, "g"),
            dxil("ThreadId", 93, "c"),
            dxil("Barrier", 80, "c"),
            dxil("StorePatch", 106, "dh"),
        ]))
        .unwrap();
        assert_eq!(
            text,
            "// Instructions: Barrier=80, ThreadId=93\n\
             if (op == 80 || op == 93)\n  \
             return pSM->IsCS();\n\
             // Instructions: StorePatch=106\n\
             if (op == 106)\n  \
             return pSM->IsDS() || pSM->IsHS();\n\
             // Instructions: EmitStream=97\n\
             if (op == 97)\n  \
             return pSM->IsGS();\n\
             // Instructions: Discard=82, DerivCoarseX=83\n\
             if (82 <= op && op <= 83)\n  \
             return pSM->IsPS();\n\
             return true;\n"
        );
    }

    #[test]
    fn empty_shader_models_are_rejected() {
        let err = valopcode_sm_text(&db(vec![dxil("Sin", 13, "*"), dxil("X", 5, "")])).unwrap_err();
        assert!(matches!(
            &err,
            GenError::EmptyShaderModels { instruction } if instruction == "X"
        ));
        assert_eq!(err.to_string(), "instruction X has an empty shader model list");
    }

    #[test]
    fn universal_opcodes_fall_through() {
        let text = valopcode_sm_text(&db(vec![dxil("Sin", 13, "*")])).unwrap();
        assert_eq!(text, "return true;\n");
    }
}
