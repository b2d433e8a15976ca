//! C++ `enum class` declarations and the validation-rule message switch.

use isa_db::{Database, Enum, EnumValue};
use tracing::debug;

use crate::errors::GenResult;
use crate::fmtln;
use crate::ordering::{by_category, CategoryGroups, GroupEdge};
use crate::srcgen::{escape_c_string, Formatter};

/// Enumerations that end with an exclusive last-value marker.
const LAST_VALUE_MARKERS: &[(&str, &str)] =
    &[("OpCode", "NumOpCodes"), ("OpCodeClass", "NumOpClasses")];

/// Name of the enumeration listing validation rules.
pub const VALIDATION_RULE_ENUM: &str = "ValidationRule";

/// Rendering switches for [`enum_decl`]. They never alter the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumOptions {
    /// Omit the explicit `= value` assignment.
    pub hide_val: bool,
    /// Order values by `(category, name)` instead of declaration order.
    pub sort_val: bool,
}

impl Default for EnumOptions {
    fn default() -> Self {
        Self {
            hide_val: false,
            sort_val: true,
        }
    }
}

fn last_value_marker(enum_name: &str) -> Option<&'static str> {
    LAST_VALUE_MARKERS
        .iter()
        .find_map(|(name, marker)| (*name == enum_name).then_some(*marker))
}

/// Writes one enumeration declaration into `fmt`.
pub fn write_enum(fmt: &mut Formatter, e: &Enum, options: EnumOptions) {
    fmtln!(fmt, "// {}", e.doc);
    fmtln!(fmt, "enum class {} : unsigned {{", e.name);
    let values: Vec<&EnumValue> = if options.sort_val {
        by_category(&e.values)
    } else {
        e.values.iter().collect()
    };
    let mut groups = CategoryGroups::new();
    for v in &values {
        let edge = groups.advance(&v.category);
        if edge.starts_group() {
            if edge == GroupEdge::Changed {
                fmt.empty_line();
            }
            fmtln!(fmt, "  // {}", v.category);
        }
        let mut line = format!("  {}", v.name);
        if !e.is_internal && !options.hide_val {
            line.push_str(&format!(" = {}", v.value));
        }
        line.push(',');
        if !v.doc.is_empty() {
            line.push_str(&format!(" // {}", v.doc));
        }
        fmt.line(line);
    }
    if let Some(marker) = last_value_marker(&e.name) {
        fmt.empty_line();
        fmtln!(
            fmt,
            "  {marker} = {} // exclusive last value of enumeration",
            values.len()
        );
    }
    fmt.line("};");
}

/// Renders the declaration of the enumeration called `name`.
///
/// # Errors
///
/// Fails if no enumeration has that name.
pub fn enum_decl(db: &Database, name: &str, options: EnumOptions) -> GenResult<String> {
    let e = db.enum_named(name)?;
    let mut fmt = Formatter::new();
    write_enum(&mut fmt, e, options);
    Ok(fmt.finish())
}

/// Renders every enumeration, ordered by name, with default options.
#[must_use]
pub fn all_enums(db: &Database) -> String {
    let mut enums: Vec<&Enum> = db.enums().iter().collect();
    enums.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(enums = enums.len(), "rendering enum declarations");
    let mut fmt = Formatter::new();
    for e in enums {
        write_enum(&mut fmt, e, EnumOptions::default());
    }
    fmt.finish()
}

/// Renders the validation-rule enumeration without explicit values.
///
/// # Errors
///
/// Fails if the database has no `ValidationRule` enumeration.
pub fn valrule_enum(db: &Database) -> GenResult<String> {
    enum_decl(
        db,
        VALIDATION_RULE_ENUM,
        EnumOptions {
            hide_val: true,
            ..EnumOptions::default()
        },
    )
}

/// Renders a `switch` mapping each validation rule to its message.
///
/// # Errors
///
/// Fails if the database has no `ValidationRule` enumeration.
pub fn valrule_text(db: &Database) -> GenResult<String> {
    let e = db.enum_named(VALIDATION_RULE_ENUM)?;
    let mut fmt = Formatter::new();
    fmt.line("switch(value) {");
    for v in &e.values {
        fmtln!(
            fmt,
            "  case hlsl::ValidationRule::{}: return \"{}\";",
            v.name,
            escape_c_string(&v.err_msg)
        );
    }
    fmt.line("}");
    Ok(fmt.finish())
}

#[cfg(test)]
mod tests {
    use isa_db::DatabaseContents;
    use rstest::rstest;

    use super::*;

    fn value(name: &str, value: i64, category: &str, doc: &str) -> EnumValue {
        EnumValue {
            name: name.to_string(),
            value,
            category: category.to_string(),
            doc: doc.to_string(),
            ..EnumValue::default()
        }
    }

    fn shader_kind() -> Enum {
        Enum {
            name: "ShaderKind".to_string(),
            doc: "Shader stages".to_string(),
            values: vec![
                value("Vertex", 1, "Graphics", "vertex shader"),
                value("Compute", 5, "Compute", ""),
                value("Pixel", 0, "Graphics", ""),
            ],
            is_internal: false,
        }
    }

    fn db_with(enums: Vec<Enum>) -> Database {
        Database::new(DatabaseContents {
            enums,
            ..DatabaseContents::default()
        })
        .unwrap()
    }

    #[test]
    fn sorted_values_are_grouped_by_category() {
        let text = enum_decl(&db_with(vec![shader_kind()]), "ShaderKind", EnumOptions::default())
            .unwrap();
        assert_eq!(
            text,
            "// Shader stages\n\
             enum class ShaderKind : unsigned {\n  \
             // Compute\n  \
             Compute = 5,\n\
             \n  \
             // Graphics\n  \
             Pixel = 0,\n  \
             Vertex = 1, // vertex shader\n\
             };\n"
        );
    }

    #[rstest]
    #[case::hidden(true, false)]
    #[case::shown(false, true)]
    fn hide_val_controls_assignments(#[case] hide_val: bool, #[case] expect_values: bool) {
        let text = enum_decl(
            &db_with(vec![shader_kind()]),
            "ShaderKind",
            EnumOptions {
                hide_val,
                ..EnumOptions::default()
            },
        )
        .unwrap();
        assert_eq!(text.contains(" = "), expect_values);
        assert!(text.contains("  Pixel,\n") != expect_values);
    }

    #[test]
    fn unsorted_values_keep_declaration_order() {
        let text = enum_decl(
            &db_with(vec![shader_kind()]),
            "ShaderKind",
            EnumOptions {
                sort_val: false,
                ..EnumOptions::default()
            },
        )
        .unwrap();
        let vertex = text.find("Vertex").unwrap();
        let compute = text.find("Compute =").unwrap();
        let pixel = text.find("Pixel").unwrap();
        assert!(vertex < compute && compute < pixel);
        assert_eq!(text.matches("// Graphics").count(), 2);
    }

    #[test]
    fn internal_enums_never_carry_values() {
        let mut e = shader_kind();
        e.is_internal = true;
        let text = enum_decl(&db_with(vec![e]), "ShaderKind", EnumOptions::default()).unwrap();
        assert!(!text.contains(" = "));
    }

    #[test]
    fn opcode_enum_gets_exclusive_last_marker() {
        let mut e = shader_kind();
        e.name = "OpCode".to_string();
        let text = enum_decl(&db_with(vec![e]), "OpCode", EnumOptions::default()).unwrap();
        assert!(text.ends_with(
            "\n\n  NumOpCodes = 3 // exclusive last value of enumeration\n};\n"
        ));
    }

    #[test]
    fn all_enums_are_sorted_by_name() {
        let mut a = shader_kind();
        a.name = "Zeta".to_string();
        let mut b = shader_kind();
        b.name = "Alpha".to_string();
        let text = all_enums(&db_with(vec![a, b]));
        assert!(text.find("enum class Alpha").unwrap() < text.find("enum class Zeta").unwrap());
    }

    #[test]
    fn validation_rule_enum_and_messages() {
        let mut rule = value("InstrOload", 0, "Instruction", "");
        rule.err_msg = "DXIL intrinsic overload must be \"valid\"".to_string();
        let e = Enum {
            name: VALIDATION_RULE_ENUM.to_string(),
            doc: "Known validation rules".to_string(),
            values: vec![rule],
            is_internal: false,
        };
        let db = db_with(vec![e]);

        let decl = valrule_enum(&db).unwrap();
        assert!(decl.contains("  InstrOload,\n"));

        assert_eq!(
            valrule_text(&db).unwrap(),
            "switch(value) {\n  \
             case hlsl::ValidationRule::InstrOload: return \"DXIL intrinsic overload must be \\\"valid\\\"\";\n\
             }\n"
        );
    }

    #[test]
    fn missing_enum_is_an_error() {
        assert!(enum_decl(&db_with(vec![]), "Nope", EnumOptions::default()).is_err());
        assert!(valrule_text(&db_with(vec![])).is_err());
    }
}
