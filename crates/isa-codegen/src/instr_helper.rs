//! C++ instruction helper structs (`DxilInstructions.h`).
//!
//! Each non-reserved instruction gets a thin wrapper over `llvm::Instruction`
//! with an identification test, validation hooks and operand accessors.

use isa_db::{Database, Instruction, Operand};
use tracing::debug;

use crate::errors::{GenError, GenResult};
use crate::fmtln;
use crate::srcgen::{banner_line, banner_rule, Formatter};

/// C++ type for an immediate operand type code.
///
/// # Errors
///
/// Returns [`GenError::UnsupportedType`] for codes without a mapping.
pub fn const_operand_type(op: &Operand) -> GenResult<&'static str> {
    match op.llvm_type.as_str() {
        "i1" => Ok("bool"),
        "i8" => Ok("int8_t"),
        "u8" => Ok("uint8_t"),
        "i32" => Ok("int32_t"),
        "u32" => Ok("uint32_t"),
        other => Err(GenError::UnsupportedType {
            ty: other.to_string(),
            operand: op.name.clone(),
        }),
    }
}

/// Expression extracting the immediate value of `op` from `Instr`.
///
/// # Errors
///
/// See [`const_operand_type`].
pub fn const_operand_expr(op: &Operand) -> GenResult<String> {
    let ty = const_operand_type(op)?;
    Ok(format!(
        "({ty})(llvm::dyn_cast<llvm::ConstantInt>(Instr->getOperand({}))->getZExtValue())",
        op.call_operand_index()
    ))
}

/// Name of the helper struct for `instr`.
#[must_use]
pub fn struct_name(instr: &Instruction) -> String {
    if !instr.inst_helper_prefix.is_empty() {
        format!("{}_{}", instr.inst_helper_prefix, instr.name)
    } else if instr.is_dxil_op {
        format!("DxilInst_{}", instr.name)
    } else {
        format!("LlvmInst_{}", instr.name)
    }
}

const fn bool_lit(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn write_struct(fmt: &mut Formatter, instr: &Instruction) -> GenResult<()> {
    let name = struct_name(instr);
    if !instr.doc.is_empty() {
        fmtln!(fmt, "/// This instruction {}", instr.doc);
    }
    fmtln!(fmt, "struct {name} {{");
    fmt.line("  const llvm::Instruction *Instr;");
    fmt.line("  // Construction and identification");
    fmtln!(fmt, "  {name}(llvm::Instruction *pInstr) : Instr(pInstr) {{}}");
    fmt.line("  operator bool() const {");
    if instr.is_dxil_op {
        fmtln!(
            fmt,
            "    return hlsl::OP::IsDxilOpFuncCallInst(Instr, {});",
            instr.fully_qualified_name()
        );
    } else {
        fmtln!(
            fmt,
            "    return Instr->getOpcode() == llvm::Instruction::{};",
            instr.name
        );
    }
    fmt.line("  }");
    fmt.line("  // Validation support");
    fmtln!(
        fmt,
        "  bool isAllowed() const {{ return {}; }}",
        bool_lit(instr.is_allowed)
    );
    if instr.is_dxil_op {
        fmt.line("  bool isArgumentListValid() const {");
        fmtln!(
            fmt,
            "    if ({} != llvm::dyn_cast<llvm::CallInst>(Instr)->getNumArgOperands()) return false;",
            instr.ops.len().saturating_sub(1)
        );
        fmt.line("    return true;");
        fmt.line("  }");
        let mut wrote_accessors = false;
        // 0 is the result and 1 the opcode; accessors start at the first argument.
        for op in instr.ops.iter().filter(|op| op.pos > 1) {
            if !wrote_accessors {
                fmt.line("  // Accessors");
                wrote_accessors = true;
            }
            fmtln!(
                fmt,
                "  llvm::Value *get_{}() const {{ return Instr->getOperand({}); }}",
                op.name,
                op.call_operand_index()
            );
            if op.is_const {
                fmtln!(
                    fmt,
                    "  {} get_{}_val() const {{ return {}; }}",
                    const_operand_type(op)?,
                    op.name,
                    const_operand_expr(op)?
                );
            }
        }
    }
    fmt.line("};");
    fmt.empty_line();
    Ok(())
}

/// Renders the helper structs only, for splicing into an existing header.
///
/// # Errors
///
/// Returns [`GenError::UnsupportedType`] when a constant operand has a type
/// without a C++ mapping.
pub fn instr_helper_body(db: &Database) -> GenResult<String> {
    let mut fmt = Formatter::new();
    let mut count = 0usize;
    for instr in db.instructions().iter().filter(|i| !i.is_reserved) {
        write_struct(&mut fmt, instr)?;
        count += 1;
    }
    debug!(structs = count, "rendered instruction helpers");
    Ok(fmt.finish())
}

/// Renders the complete header with banner and namespace.
///
/// # Errors
///
/// See [`instr_helper_body`].
pub fn instr_helper_header(db: &Database) -> GenResult<String> {
    let mut fmt = Formatter::new();
    fmt.line(banner_rule());
    fmt.line(banner_line(""));
    fmt.line(banner_line("DxilInstructions.h"));
    fmt.line(banner_line(""));
    fmt.line(banner_line(
        "This file provides a library of instruction helper classes.",
    ));
    fmt.line(banner_line(""));
    fmt.line(banner_line("GENERATED FILE - DO NOT EDIT"));
    fmt.line(banner_line(""));
    fmt.line(banner_rule());
    fmt.empty_line();
    fmt.line("namespace hlsl {");
    fmt.push_str(&instr_helper_body(db)?);
    fmt.line("} // namespace hlsl");
    Ok(fmt.finish())
}

#[cfg(test)]
mod tests {
    use isa_db::DatabaseContents;

    use super::*;

    fn operand(pos: u32, name: &str, ty: &str, is_const: bool) -> Operand {
        Operand {
            pos,
            name: name.to_string(),
            llvm_type: ty.to_string(),
            is_const,
            ..Operand::default()
        }
    }

    fn db(instructions: Vec<Instruction>) -> Database {
        Database::new(DatabaseContents {
            instructions,
            ..DatabaseContents::default()
        })
        .unwrap()
    }

    fn buffer_load(mask_type: &str) -> Instruction {
        Instruction {
            name: "BufferLoad".to_string(),
            is_dxil_op: true,
            is_allowed: true,
            doc: "reads from a TypedBuffer".to_string(),
            ops: vec![
                operand(0, "", "$r", false),
                operand(1, "opcode", "i32", false),
                operand(2, "srv", "res", false),
                operand(3, "mask", mask_type, true),
            ],
            ..Instruction::default()
        }
    }

    #[test]
    fn dxil_op_struct_has_accessors() {
        let text = instr_helper_body(&db(vec![buffer_load("i8")])).unwrap();
        assert_eq!(
            text,
            "/// This instruction reads from a TypedBuffer\n\
             struct DxilInst_BufferLoad {\n  \
             const llvm::Instruction *Instr;\n  \
             // Construction and identification\n  \
             DxilInst_BufferLoad(llvm::Instruction *pInstr) : Instr(pInstr) {}\n  \
             operator bool() const {\n    \
             return hlsl::OP::IsDxilOpFuncCallInst(Instr, hlsl::OP::OpCode::BufferLoad);\n  \
             }\n  \
             // Validation support\n  \
             bool isAllowed() const { return true; }\n  \
             bool isArgumentListValid() const {\n    \
             if (3 != llvm::dyn_cast<llvm::CallInst>(Instr)->getNumArgOperands()) return false;\n    \
             return true;\n  \
             }\n  \
             // Accessors\n  \
             llvm::Value *get_srv() const { return Instr->getOperand(1); }\n  \
             llvm::Value *get_mask() const { return Instr->getOperand(2); }\n  \
             int8_t get_mask_val() const { return (int8_t)(llvm::dyn_cast<llvm::ConstantInt>(Instr->getOperand(2))->getZExtValue()); }\n\
             };\n\n"
        );
    }

    #[test]
    fn llvm_instruction_uses_opcode_comparison() {
        let add = Instruction {
            name: "Add".to_string(),
            is_allowed: false,
            ..Instruction::default()
        };
        let text = instr_helper_body(&db(vec![add])).unwrap();
        assert!(text.starts_with("struct LlvmInst_Add {\n"));
        assert!(text.contains("    return Instr->getOpcode() == llvm::Instruction::Add;\n"));
        assert!(text.contains("  bool isAllowed() const { return false; }\n"));
        assert!(!text.contains("isArgumentListValid"));
    }

    #[test]
    fn reserved_instructions_are_skipped_and_prefix_is_honored() {
        let reserved = Instruction {
            name: "Reserved0".to_string(),
            is_reserved: true,
            ..Instruction::default()
        };
        let prefixed = Instruction {
            name: "Ret".to_string(),
            inst_helper_prefix: "LlvmTerm".to_string(),
            ..Instruction::default()
        };
        let text = instr_helper_body(&db(vec![reserved, prefixed])).unwrap();
        assert!(!text.contains("Reserved0"));
        assert!(text.contains("struct LlvmTerm_Ret {"));
    }

    #[test]
    fn unsupported_constant_type_is_fatal() {
        let err = instr_helper_body(&db(vec![buffer_load("f32")])).unwrap_err();
        assert!(matches!(
            err,
            GenError::UnsupportedType { ty, operand } if ty == "f32" && operand == "mask"
        ));
    }

    #[test]
    fn header_wraps_body_in_namespace() {
        let text = instr_helper_header(&db(vec![buffer_load("u32")])).unwrap();
        assert!(text.starts_with(&banner_rule()));
        assert!(text.contains("\nnamespace hlsl {\n/// This instruction"));
        assert!(text.contains("uint32_t get_mask_val()"));
        assert!(text.ends_with("};\n\n} // namespace hlsl\n"));
    }

    #[test]
    fn header_banner_marks_file_as_generated() {
        let text = instr_helper_header(&db(vec![buffer_load("u32")])).unwrap();
        let banner: Vec<&str> = text.lines().take(9).collect();
        assert_eq!(banner[2], banner_line("DxilInstructions.h"));
        assert_eq!(banner[6], banner_line("GENERATED FILE - DO NOT EDIT"));
        assert_eq!(banner[8], banner_rule());
        assert!(!text.contains("TODO"));
        assert!(!text.contains("Copyright"));
    }
}
