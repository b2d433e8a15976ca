//! Named artifacts: whole generated files selectable from the command line
//! and fragments spliced into tagged regions of checked-in sources.

use clap::ValueEnum;
use isa_db::Database;

use crate::codetags::CodeTagError;
use crate::docs_ref::DocsRefGen;
use crate::enums::{all_enums, enum_decl, valrule_enum, valrule_text, EnumOptions};
use crate::errors::GenResult;
use crate::instr_helper::{instr_helper_body, instr_helper_header};
use crate::intrinsics::{
    get_unsigned_cases, has_unsigned_cases, intrinsic_enum, intrinsic_stats, intrinsic_tables,
};
use crate::overloads::{opcode_signatures, opfunc_props, opfunc_table, overload_tables};
use crate::passes::{init_passes, is_pass_option_name, pass_arg_descs, pass_arg_names};
use crate::rst::{
    instrs_rst, opcodes_rst, sem_interpretation_enum_rst, sem_interpretation_table_rst,
    sigpoint_rst, valrules_rst,
};
use crate::sigpoints::{interpretation_table, sigpoint_table, sigpoint_tables};
use crate::validation::{instrs_pred, valopcode_sm_text, validation_functions, IdAttr, InstrFlag};

/// Whole-file generators selectable with `--gen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenKind {
    /// HTML instruction and validation rule reference.
    DocsRef,
    /// C++ instruction helper header.
    InstHeader,
    /// Every enumeration declaration.
    Enums,
    /// Opcode property and overload function tables.
    Oloads,
    /// Validator dispatch functions.
    Valfns,
    /// Signature point and interpretation X-macro tables.
    Sigpoints,
}

impl GenKind {
    /// Renders the generator's output.
    ///
    /// # Errors
    ///
    /// Propagates the generator's failure.
    pub fn render(self, db: &Database) -> GenResult<String> {
        match self {
            Self::DocsRef => DocsRefGen::new(db).render(),
            Self::InstHeader => instr_helper_header(db),
            Self::Enums => Ok(all_enums(db)),
            Self::Oloads => overload_tables(db),
            Self::Valfns => validation_functions(db),
            Self::Sigpoints => sigpoint_tables(db),
        }
    }
}

/// A fragment that can fill a tagged region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// `oloads-props`
    OloadsProps,
    /// `oloads-funcs`
    OloadsFuncs,
    /// `enum-decl <name> [hide_val] [sort_val=false]`
    EnumDecl {
        /// Enumeration to declare.
        name: String,
        /// Rendering switches.
        options: EnumOptions,
    },
    /// `valrule-enum`
    ValruleEnum,
    /// `valrule-text`
    ValruleText,
    /// `instr-helper`
    InstrHelper,
    /// `instrs-pred <var> <flag> [attr]`
    InstrsPred {
        /// Variable the condition tests.
        var: String,
        /// Selection flag.
        flag: InstrFlag,
        /// Id attribute compared.
        attr: IdAttr,
    },
    /// `instrs-rst`
    InstrsRst,
    /// `opcodes-rst`
    OpcodesRst,
    /// `valrules-rst`
    ValrulesRst,
    /// `opsigs`
    OpSigs,
    /// `valopcode-sm-text`
    ValopcodeSmText,
    /// `sigpoint-table`
    SigpointTable,
    /// `interpretation-table`
    InterpretationTable,
    /// `sigpoint-rst`
    SigpointRst,
    /// `sem-interpretation-enum-rst`
    SemInterpretationEnumRst,
    /// `sem-interpretation-table-rst`
    SemInterpretationTableRst,
    /// `init-passes`
    InitPasses,
    /// `pass-arg-names`
    PassArgNames,
    /// `pass-arg-descs`
    PassArgDescs,
    /// `is-pass-option-name`
    IsPassOptionName,
    /// `hlsl-intrinsic-stats`
    HlslIntrinsicStats,
    /// `hlsl-intrinsics`
    HlslIntrinsics,
    /// `enum-hlsl-intrinsics`
    EnumHlslIntrinsics,
    /// `has-unsigned-hlsl-intrinsics`
    HasUnsignedHlslIntrinsics,
    /// `get-unsigned-hlsl-intrinsics`
    GetUnsignedHlslIntrinsics,
}

fn missing(artifact: &str, argument: &'static str) -> CodeTagError {
    CodeTagError::MissingArgument {
        artifact: artifact.to_string(),
        argument,
    }
}

fn enum_options(artifact: &str, flags: &[&str]) -> Result<EnumOptions, CodeTagError> {
    let mut options = EnumOptions::default();
    for &flag in flags {
        match flag {
            "hide_val" | "hide_val=true" => options.hide_val = true,
            "hide_val=false" => options.hide_val = false,
            "sort_val" | "sort_val=true" => options.sort_val = true,
            "sort_val=false" => options.sort_val = false,
            other => {
                return Err(CodeTagError::InvalidArgument {
                    artifact: artifact.to_string(),
                    argument: other.to_string(),
                })
            }
        }
    }
    Ok(options)
}

impl Artifact {
    /// Parses the whitespace-separated text after `CODEGEN:BEGIN`.
    ///
    /// # Errors
    ///
    /// Fails on an empty or unknown artifact name, a missing required
    /// argument, or an unrecognized option.
    pub fn parse(spec: &str) -> Result<Self, CodeTagError> {
        let words: Vec<&str> = spec.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(CodeTagError::UnknownArtifact(String::new()));
        };
        let artifact = match name {
            "oloads-props" => Self::OloadsProps,
            "oloads-funcs" => Self::OloadsFuncs,
            "enum-decl" => {
                let (&enum_name, flags) = args
                    .split_first()
                    .ok_or_else(|| missing(name, "enumeration name"))?;
                Self::EnumDecl {
                    name: enum_name.to_string(),
                    options: enum_options(name, flags)?,
                }
            }
            "valrule-enum" => Self::ValruleEnum,
            "valrule-text" => Self::ValruleText,
            "instr-helper" => Self::InstrHelper,
            "instrs-pred" => {
                let var = args.first().ok_or_else(|| missing(name, "variable"))?;
                let flag = args.get(1).ok_or_else(|| missing(name, "predicate"))?;
                let attr = args
                    .get(2)
                    .map_or(Ok(IdAttr::default()), |a| a.parse())
                    .map_err(CodeTagError::Generate)?;
                Self::InstrsPred {
                    var: (*var).to_string(),
                    flag: flag.parse().map_err(CodeTagError::Generate)?,
                    attr,
                }
            }
            "instrs-rst" => Self::InstrsRst,
            "opcodes-rst" => Self::OpcodesRst,
            "valrules-rst" => Self::ValrulesRst,
            "opsigs" => Self::OpSigs,
            "valopcode-sm-text" => Self::ValopcodeSmText,
            "sigpoint-table" => Self::SigpointTable,
            "interpretation-table" => Self::InterpretationTable,
            "sigpoint-rst" => Self::SigpointRst,
            "sem-interpretation-enum-rst" => Self::SemInterpretationEnumRst,
            "sem-interpretation-table-rst" => Self::SemInterpretationTableRst,
            "init-passes" => Self::InitPasses,
            "pass-arg-names" => Self::PassArgNames,
            "pass-arg-descs" => Self::PassArgDescs,
            "is-pass-option-name" => Self::IsPassOptionName,
            "hlsl-intrinsic-stats" => Self::HlslIntrinsicStats,
            "hlsl-intrinsics" => Self::HlslIntrinsics,
            "enum-hlsl-intrinsics" => Self::EnumHlslIntrinsics,
            "has-unsigned-hlsl-intrinsics" => Self::HasUnsignedHlslIntrinsics,
            "get-unsigned-hlsl-intrinsics" => Self::GetUnsignedHlslIntrinsics,
            other => return Err(CodeTagError::UnknownArtifact(other.to_string())),
        };
        Ok(artifact)
    }

    /// Renders the fragment.
    ///
    /// # Errors
    ///
    /// Propagates the generator's failure.
    pub fn render(&self, db: &Database) -> GenResult<String> {
        match self {
            Self::OloadsProps => opfunc_props(db),
            Self::OloadsFuncs => opfunc_table(db),
            Self::EnumDecl { name, options } => enum_decl(db, name, *options),
            Self::ValruleEnum => valrule_enum(db),
            Self::ValruleText => valrule_text(db),
            Self::InstrHelper => instr_helper_body(db),
            Self::InstrsPred { var, flag, attr } => instrs_pred(db, var, *flag, *attr),
            Self::InstrsRst => instrs_rst(db),
            Self::OpcodesRst => opcodes_rst(db),
            Self::ValrulesRst => valrules_rst(db),
            Self::OpSigs => Ok(opcode_signatures(db)),
            Self::ValopcodeSmText => valopcode_sm_text(db),
            Self::SigpointTable => sigpoint_table(db),
            Self::InterpretationTable => interpretation_table(db),
            Self::SigpointRst => sigpoint_rst(db),
            Self::SemInterpretationEnumRst => sem_interpretation_enum_rst(db),
            Self::SemInterpretationTableRst => sem_interpretation_table_rst(db),
            Self::InitPasses => Ok(init_passes(db)),
            Self::PassArgNames => Ok(pass_arg_names(db)),
            Self::PassArgDescs => Ok(pass_arg_descs(db)),
            Self::IsPassOptionName => Ok(is_pass_option_name(db)),
            Self::HlslIntrinsicStats => intrinsic_stats(db),
            Self::HlslIntrinsics => intrinsic_tables(db),
            Self::EnumHlslIntrinsics => Ok(intrinsic_enum(db)),
            Self::HasUnsignedHlslIntrinsics => Ok(has_unsigned_cases(db)),
            Self::GetUnsignedHlslIntrinsics => Ok(get_unsigned_cases(db)),
        }
    }
}
