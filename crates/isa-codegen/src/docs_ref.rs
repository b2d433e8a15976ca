//! HTML reference page for DXIL operations and validation rules.

use isa_db::{Categorized, Database, Instruction, ValidationRule};
use tracing::debug;

use crate::errors::GenResult;
use crate::fmtln;
use crate::ordering::{by_category, CategoryGroups, GroupEdge};
use crate::srcgen::Formatter;

/// Generator for the reference document.
#[derive(Debug)]
pub struct DocsRefGen<'db> {
    db: &'db Database,
    instrs: Vec<&'db Instruction>,
    val_rules: Vec<&'db ValidationRule>,
}

impl<'db> DocsRefGen<'db> {
    /// Selects DXIL operations and validation rules in category order.
    #[must_use]
    pub fn new(db: &'db Database) -> Self {
        Self {
            db,
            instrs: by_category(db.instructions().iter().filter(|i| i.is_dxil_op)),
            val_rules: by_category(db.val_rules()),
        }
    }

    /// Renders the complete HTML page.
    ///
    /// # Errors
    ///
    /// Fails if an operand references an unknown enumeration.
    pub fn render(&self) -> GenResult<String> {
        debug!(
            instructions = self.instrs.len(),
            rules = self.val_rules.len(),
            "rendering reference docs"
        );
        let mut fmt = Formatter::new();
        self.header(&mut fmt);
        self.instruction_details(&mut fmt)?;
        self.rule_details(&mut fmt);
        fmt.line("</body></html>");
        Ok(fmt.finish())
    }

    fn header(&self, fmt: &mut Formatter) {
        fmt.line("<!DOCTYPE html>");
        fmt.line("<html><head><title>DXIL Reference</title>");
        fmt.line("<style>body { font-family: Verdana; font-size: small; }</style>");
        fmt.line("</head><body><h1>DXIL Reference</h1>");
        toc(fmt, "Instructions", "i", &self.instrs);
        toc(fmt, "Rules", "r", &self.val_rules);
    }

    fn instruction_details(&self, fmt: &mut Formatter) -> GenResult<()> {
        fmt.line("<h2>Instruction Details</h2>");
        for instr in &self.instrs {
            fmtln!(fmt, "<h3><a name='i{0}'>{0}</a></h3>", instr.name);
            fmtln!(
                fmt,
                "<div>Opcode: {}. This instruction {}.</div>",
                instr.dxil_opid,
                instr.doc
            );
            if !instr.remarks.is_empty() {
                fmtln!(fmt, "<div> {}</div>", instr.remarks);
            }
            fmt.line("<div>Operands:</div>");
            fmt.line("<ul>");
            for op in &instr.ops {
                if op.pos == 0 {
                    fmtln!(fmt, "<li>result: {} - {}</li>", op.llvm_type, op.doc);
                    continue;
                }
                let doc = if op.doc.is_empty() {
                    String::new()
                } else {
                    format!(" - {}", op.doc)
                };
                let enum_desc = if op.enum_name.is_empty() {
                    String::new()
                } else {
                    let e = self.db.enum_named(&op.enum_name)?;
                    format!(
                        " one of {}: {}",
                        op.enum_name,
                        e.value_names().collect::<Vec<_>>().join(",")
                    )
                };
                fmtln!(
                    fmt,
                    "<li>{} - {}: {}{doc}{enum_desc}</li>",
                    op.call_operand_index(),
                    op.name,
                    op.llvm_type
                );
            }
            fmt.line("</ul>");
            fmt.line("<div><a href='#Instructions'>(top)</a></div>");
        }
        Ok(())
    }

    fn rule_details(&self, fmt: &mut Formatter) {
        fmt.line("<h2>Rule Details</h2>");
        for rule in &self.val_rules {
            fmtln!(fmt, "<h3><a name='r{0}'>{0}</a></h3>", rule.name);
            fmtln!(fmt, "<div>{}</div>", rule.doc);
            fmt.line("<div><a href='#Rules'>(top)</a></div>");
        }
    }
}

/// Table of contents: one bold heading and link list per category.
fn toc<T: Categorized>(fmt: &mut Formatter, title: &str, anchor_prefix: &str, values: &[&T]) {
    fmtln!(fmt, "<h2><a name='{title}'>{title}</a></h2>");
    let mut groups = CategoryGroups::new();
    for value in values {
        let edge = groups.advance(value.category());
        if edge.starts_group() {
            if edge == GroupEdge::Changed {
                fmt.line("</ul>");
            }
            fmtln!(fmt, "<div><b>{}</b></div><ul>", value.category());
        }
        fmtln!(
            fmt,
            "<li><a href='#{anchor_prefix}{0}'>{0}</a></li>",
            value.name()
        );
    }
    if groups.has_open_group() {
        fmt.line("</ul>");
    }
}

#[cfg(test)]
mod tests {
    use isa_db::{DatabaseContents, Enum, EnumValue, Operand};

    use super::*;
    use crate::errors::GenError;

    fn sample_db(enum_name: &str) -> Database {
        let op = |pos: u32, name: &str, ty: &str, doc: &str| Operand {
            pos,
            name: name.to_string(),
            llvm_type: ty.to_string(),
            doc: doc.to_string(),
            ..Operand::default()
        };
        let mut sample = op(3, "sampleKind", "i8", "");
        sample.enum_name = enum_name.to_string();
        Database::new(DatabaseContents {
            instructions: vec![
                Instruction {
                    name: "Sin".to_string(),
                    category: "Unary float".to_string(),
                    dxil_opid: 13,
                    is_dxil_op: true,
                    doc: "returns sine(theta) for theta in radians".to_string(),
                    ops: vec![
                        op(0, "", "$o", "the result"),
                        op(1, "opcode", "i32", "DXIL opcode"),
                        op(2, "value", "$o", "input value"),
                    ],
                    ..Instruction::default()
                },
                Instruction {
                    name: "Sample".to_string(),
                    category: "Resources".to_string(),
                    dxil_opid: 60,
                    is_dxil_op: true,
                    doc: "samples a texture".to_string(),
                    remarks: "See the sampling rules.".to_string(),
                    ops: vec![op(0, "", "$r", "sampled value"), sample],
                    ..Instruction::default()
                },
                Instruction {
                    name: "Add".to_string(),
                    llvm_id: 8,
                    is_allowed: true,
                    ..Instruction::default()
                },
            ],
            enums: vec![Enum {
                name: "SampleKind".to_string(),
                values: ["Point", "Linear"]
                    .iter()
                    .map(|n| EnumValue {
                        name: (*n).to_string(),
                        ..EnumValue::default()
                    })
                    .collect(),
                ..Enum::default()
            }],
            val_rules: vec![
                ValidationRule {
                    name: "META.REQUIRED".to_string(),
                    category: "Metadata".to_string(),
                    doc: "Required metadata missing".to_string(),
                    ..ValidationRule::default()
                },
                ValidationRule {
                    name: "INSTR.OPCONST".to_string(),
                    category: "Instruction".to_string(),
                    doc: "DXIL intrinsic requires an immediate constant operand".to_string(),
                    ..ValidationRule::default()
                },
            ],
            ..DatabaseContents::default()
        })
        .unwrap()
    }

    #[test]
    fn page_lists_operations_by_category() {
        let html = DocsRefGen::new(&sample_db("SampleKind")).render().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.ends_with("</body></html>\n"));
        assert!(!html.contains("iAdd"));
        let resources = html.find("<div><b>Resources</b></div><ul>").unwrap();
        let unary = html.find("<div><b>Unary float</b></div><ul>").unwrap();
        assert!(resources < unary);
        assert!(html.contains(
            "<h2><a name='Instructions'>Instructions</a></h2>\n\
             <div><b>Resources</b></div><ul>\n\
             <li><a href='#iSample'>Sample</a></li>\n\
             </ul>\n\
             <div><b>Unary float</b></div><ul>\n\
             <li><a href='#iSin'>Sin</a></li>\n\
             </ul>\n"
        ));
    }

    #[test]
    fn instruction_details_describe_operands() {
        let html = DocsRefGen::new(&sample_db("SampleKind")).render().unwrap();

        assert!(html.contains(
            "<div>Opcode: 13. This instruction returns sine(theta) for theta in radians.</div>"
        ));
        assert!(html.contains("<li>result: $o - the result</li>"));
        assert!(html.contains("<li>0 - opcode: i32 - DXIL opcode</li>"));
        assert!(html.contains("<li>1 - value: $o - input value</li>"));
        assert!(html.contains("<li>2 - sampleKind: i8 one of SampleKind: Point,Linear</li>"));
        assert!(html.contains("<div> See the sampling rules.</div>"));
    }

    #[test]
    fn rules_are_sorted_by_category_then_name() {
        let html = DocsRefGen::new(&sample_db("SampleKind")).render().unwrap();

        let instr_rule = html.find("<h3><a name='rINSTR.OPCONST'>").unwrap();
        let meta_rule = html.find("<h3><a name='rMETA.REQUIRED'>").unwrap();
        assert!(instr_rule < meta_rule);
        assert!(html.contains("<div>Required metadata missing</div>"));
    }

    #[test]
    fn unknown_operand_enum_aborts() {
        let err = DocsRefGen::new(&sample_db("Missing")).render().unwrap_err();
        assert!(matches!(err, GenError::Db(_)));
    }

    #[test]
    fn rendering_is_deterministic() {
        let db = sample_db("SampleKind");
        assert_eq!(
            DocsRefGen::new(&db).render().unwrap(),
            DocsRefGen::new(&db).render().unwrap()
        );
    }
}
