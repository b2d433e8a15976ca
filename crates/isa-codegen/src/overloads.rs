//! Opcode property tables, the `GetOpFunc` case table and opcode signatures.

use isa_db::{Database, Instruction};
use tracing::debug;

use crate::errors::{GenError, GenResult};
use crate::fmtln;
use crate::ordering::{CategoryGroups, GroupEdge};
use crate::srcgen::Formatter;

const PROPS_COLUMNS: &str = "//   OpCode                       OpCode name,                OpCodeClass                    OpCodeClass name,              void,     h,     f,     d,    i1,    i8,   i16,   i32,   i64  function attribute";

/// Overload letters in property-column order: void, half, float, double,
/// i1, i8, i16, i32, i64.
pub const OVERLOAD_COLUMNS: [char; 9] = ['v', 'h', 'f', 'd', '1', '8', 'w', 'i', 'l'];

/// Class names whose lower-camel spelling is irregular.
const LOWER_CLASS_EXCEPTIONS: &[(&str, &str)] = &[
    ("CBufferLoad", "cbufferLoad"),
    ("CBufferLoadLegacy", "cbufferLoadLegacy"),
    ("GSInstanceID", "gsInstanceID"),
];

/// Builder call for each operand type code in `OP::GetOpFunc`.
const OPERAND_TYPE_BUILDERS: &[(&str, &str)] = &[
    ("$cb", "CBRT(pETy);"),
    ("$o", "A(pETy);"),
    ("$r", "RRT(pETy);"),
    ("d", "A(pF64);"),
    ("dims", "A(pDim);"),
    ("f", "A(pF32);"),
    ("h", "A(pF16);"),
    ("i1", "A(pI1);"),
    ("i16", "A(pI16);"),
    ("i32", "A(pI32);"),
    ("i32c", "A(pI32C);"),
    ("i64", "A(pI64);"),
    ("i8", "A(pI8);"),
    ("$u4", "A(pI4S);"),
    ("pf32", "A(pPF32);"),
    ("res", "A(pRes);"),
    ("splitdouble", "A(pSDT);"),
    ("twoi32", "A(p2I32);"),
    ("twof32", "A(p2F32);"),
    ("fouri32", "A(p4I32);"),
    ("fourf32", "A(p4F32);"),
    ("u32", "A(pI32);"),
    ("u64", "A(pI64);"),
    ("u8", "A(pI8);"),
    ("v", "A(pV);"),
    ("w", "A(pWav);"),
    ("SamplePos", "A(pPos);"),
];

/// Lower-camel form of an opcode class name.
#[must_use]
pub fn lower_class_name(class: &str) -> String {
    if let Some((_, lower)) = LOWER_CLASS_EXCEPTIONS.iter().find(|(c, _)| *c == class) {
        return (*lower).to_string();
    }
    let mut chars = class.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

fn attribute_name(instr: &Instruction) -> GenResult<&'static str> {
    match instr.fn_attr.as_str() {
        "" => Ok("None"),
        "ro" => Ok("ReadOnly"),
        "rn" => Ok("ReadNone"),
        other => Err(GenError::UnsupportedAttribute {
            attr: other.to_string(),
            instruction: instr.name.clone(),
        }),
    }
}

fn operand_builder(instr: &Instruction, ty: &str) -> GenResult<&'static str> {
    OPERAND_TYPE_BUILDERS
        .iter()
        .find_map(|(code, text)| (*code == ty).then_some(*text))
        .ok_or_else(|| GenError::UnsupportedType {
            ty: ty.to_string(),
            operand: instr.name.clone(),
        })
}

/// DXIL operations ordered by opcode id.
fn dxil_ops_by_id(db: &Database) -> Vec<&Instruction> {
    let mut instrs: Vec<&Instruction> = db.instructions().iter().filter(|i| i.is_dxil_op).collect();
    instrs.sort_by_key(|i| i.dxil_opid);
    instrs
}

/// Emits the category comment when `instr` starts a new category.
fn category_break<'a>(
    fmt: &mut Formatter,
    groups: &mut CategoryGroups<'a>,
    instr: &'a Instruction,
    heading: impl FnOnce(&str) -> String,
) {
    let edge = groups.advance(&instr.category);
    if edge.starts_group() {
        if edge == GroupEdge::Changed {
            fmt.empty_line();
        }
        fmt.line(heading(&instr.category));
    }
}

/// Renders the `OP::m_OpCodeProps` initializer.
///
/// # Errors
///
/// Returns [`GenError::UnsupportedAttribute`] for unknown attribute codes.
pub fn opfunc_props(db: &Database) -> GenResult<String> {
    let instrs = dxil_ops_by_id(db);
    debug!(opcodes = instrs.len(), "rendering opcode properties");
    let mut fmt = Formatter::new();
    fmt.line("const OP::OpCodeProperty OP::m_OpCodeProps[(unsigned)OP::OpCode::NumOpCodes] = {");
    fmt.line(PROPS_COLUMNS);
    let mut groups = CategoryGroups::new();
    for instr in instrs {
        category_break(&mut fmt, &mut groups, instr, |category| {
            format!("  // {category:118} void,     h,     f,     d,    i1,    i8,   i16,   i32,   i64  function attribute")
        });
        let flags: String = OVERLOAD_COLUMNS
            .iter()
            .map(|&letter| {
                let flag = if instr.has_overload(letter) {
                    "true,"
                } else {
                    "false,"
                };
                format!("{flag:>7}")
            })
            .collect();
        fmtln!(
            fmt,
            "  {{  OC::{:24} {:27} OCC::{:25} {:28} {flags} {:20} }},",
            format!("{},", instr.name),
            format!("\"{}\",", instr.name),
            format!("{},", instr.dxil_class),
            format!("\"{}\",", lower_class_name(&instr.dxil_class)),
            format!("Attribute::{},", attribute_name(instr)?)
        );
    }
    fmt.line("};");
    Ok(fmt.finish())
}

/// Renders the `case OpCode::X: A(..); ... break;` lines of `OP::GetOpFunc`.
///
/// # Errors
///
/// Returns [`GenError::UnsupportedType`] for operand types without a builder.
pub fn opfunc_table(db: &Database) -> GenResult<String> {
    let mut fmt = Formatter::new();
    let mut groups = CategoryGroups::new();
    for instr in dxil_ops_by_id(db) {
        category_break(&mut fmt, &mut groups, instr, |category| {
            format!("    // {category}")
        });
        let mut line = format!("  case OpCode::{:24}", format!("{}:", instr.name));
        for (idx, op) in instr.ops.iter().enumerate() {
            let text = operand_builder(instr, &op.llvm_type)?;
            if idx == 0 {
                line.push_str(&format!("{text:13}"));
            } else {
                line.push_str(&format!("{text:9}"));
            }
        }
        line.push_str("break;");
        fmt.line(line);
    }
    Ok(fmt.finish())
}

/// Renders both overload tables separated by an elision marker.
///
/// # Errors
///
/// See [`opfunc_props`] and [`opfunc_table`].
pub fn overload_tables(db: &Database) -> GenResult<String> {
    let mut out = opfunc_props(db)?;
    out.push_str("...\n");
    out.push_str(&opfunc_table(db)?);
    Ok(out)
}

/// Renders `OpCodeSignatures[]`: argument names per opcode, in id order.
#[must_use]
pub fn opcode_signatures(db: &Database) -> String {
    let instrs = dxil_ops_by_id(db);
    let mut fmt = Formatter::new();
    fmt.line("static const char *OpCodeSignatures[] = {");
    for (idx, instr) in instrs.iter().enumerate() {
        // Skip the result (0) and the opcode itself (1).
        let args = instr
            .ops
            .iter()
            .filter(|op| op.pos > 1)
            .map(|op| op.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let comma = if idx + 1 < instrs.len() { "," } else { "" };
        fmtln!(fmt, "  \"({args})\"{comma}  // {}", instr.name);
    }
    fmt.line("};");
    fmt.finish()
}
