//! Immutable database snapshot shared by every generator.

use std::collections::{BTreeMap, BTreeSet, HashMap};
#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};
use crate::records::{Enum, Instruction, Intrinsic, Pass, ValidationRule};

/// Serializable contents of a database, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DatabaseContents {
    /// Instructions in declaration order.
    pub instructions: Vec<Instruction>,
    /// Enumerations in declaration order.
    pub enums: Vec<Enum>,
    /// Validation rules in declaration order.
    pub val_rules: Vec<ValidationRule>,
    /// Optimizer passes.
    pub passes: Vec<Pass>,
    /// High-level intrinsics.
    pub intrinsics: Vec<Intrinsic>,
    /// Signature point grid; first row is the header.
    pub sigpoint_table: Vec<Vec<String>>,
    /// Semantic interpretation grid; first row is the header.
    pub interpretation_table: Vec<Vec<String>>,
}

/// Read-only database with a name index over enumerations.
///
/// Built once and passed by reference to every generator.
#[derive(Debug, Clone)]
pub struct Database {
    contents: DatabaseContents,
    enum_index: HashMap<String, usize>,
}

impl Database {
    /// Builds a database and its enumeration index.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateEnum`] if two enumerations share a name.
    pub fn new(contents: DatabaseContents) -> DbResult<Self> {
        let mut enum_index = HashMap::with_capacity(contents.enums.len());
        for (idx, e) in contents.enums.iter().enumerate() {
            if enum_index.insert(e.name.clone(), idx).is_some() {
                return Err(DbError::DuplicateEnum(e.name.clone()));
            }
        }
        Ok(Self {
            contents,
            enum_index,
        })
    }

    /// Parses a JSON document into a database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Json`] for malformed documents and
    /// [`DbError::DuplicateEnum`] for conflicting enumeration names.
    #[cfg(feature = "serde")]
    pub fn from_json_str(text: &str) -> DbResult<Self> {
        let contents: DatabaseContents = serde_json::from_str(text)?;
        Self::new(contents)
    }

    /// Reads and parses a JSON database file.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] when the file cannot be read, otherwise the
    /// errors of [`Database::from_json_str`].
    #[cfg(feature = "serde")]
    pub fn load(path: &Path) -> DbResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DbError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// All instructions in declaration order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.contents.instructions
    }

    /// All enumerations in declaration order.
    #[must_use]
    pub fn enums(&self) -> &[Enum] {
        &self.contents.enums
    }

    /// All validation rules in declaration order.
    #[must_use]
    pub fn val_rules(&self) -> &[ValidationRule] {
        &self.contents.val_rules
    }

    /// All passes in declaration order.
    #[must_use]
    pub fn passes(&self) -> &[Pass] {
        &self.contents.passes
    }

    /// All intrinsics in declaration order.
    #[must_use]
    pub fn intrinsics(&self) -> &[Intrinsic] {
        &self.contents.intrinsics
    }

    /// Signature point grid.
    #[must_use]
    pub fn sigpoint_table(&self) -> &[Vec<String>] {
        &self.contents.sigpoint_table
    }

    /// Semantic interpretation grid.
    #[must_use]
    pub fn interpretation_table(&self) -> &[Vec<String>] {
        &self.contents.interpretation_table
    }

    /// Looks up an enumeration by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UnknownEnum`] when no enumeration has that name.
    pub fn enum_named(&self, name: &str) -> DbResult<&Enum> {
        self.enum_index
            .get(name)
            .map(|&idx| &self.contents.enums[idx])
            .ok_or_else(|| DbError::UnknownEnum(name.to_string()))
    }

    /// Distinct pass argument names, sorted.
    #[must_use]
    pub fn pass_option_names(&self) -> BTreeSet<&str> {
        self.contents
            .passes
            .iter()
            .flat_map(|p| p.args.iter().map(|a| a.name.as_str()))
            .collect()
    }

    /// Number of intrinsics per namespace, keyed by namespace name.
    #[must_use]
    pub fn namespace_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for intrinsic in &self.contents.intrinsics {
            *counts.entry(intrinsic.ns.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
