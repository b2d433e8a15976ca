//! Tagged-region updater for checked-in sources.
//!
//! A region starts at a line containing `CODEGEN:BEGIN <artifact> [args]`
//! and ends at the next line containing `CODEGEN:END`. Everything between the
//! two marker lines is replaced by the rendered artifact; the markers and all
//! text outside regions are preserved byte for byte.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use isa_db::Database;
use thiserror::Error;
use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::errors::GenError;

/// Marker opening a generated region.
pub const BEGIN_MARKER: &str = "CODEGEN:BEGIN";
/// Marker closing a generated region.
pub const END_MARKER: &str = "CODEGEN:END";

/// Files carrying tagged regions, relative to the source root.
pub const DEFAULT_UPDATE_TARGETS: &[&str] = &[
    "docs/DXIL.rst",
    "lib/HLSL/DXILOperations.cpp",
    "include/dxc/HLSL/DXILConstants.h",
    "include/dxc/HLSL/DxilValidation.h",
    "include/dxc/HLSL/DxilInstructions.h",
    "lib/HLSL/DxcOptimizer.cpp",
    "lib/HLSL/DxilValidation.cpp",
    "tools/clang/lib/Sema/gen_intrin_main_tables_15.h",
    "include/dxc/HlslIntrinsicOp.h",
    "tools/clang/tools/dxcompiler/dxcompilerobj.cpp",
    "lib/HLSL/DxilSigPoint.cpp",
];

/// Failure updating tagged regions.
#[derive(Debug, Error)]
pub enum CodeTagError {
    /// Reading or writing a target failed.
    #[error("{path}: {source}")]
    Io {
        /// Target file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A begin marker has no matching end marker.
    #[error("line {line}: region '{artifact}' is never closed")]
    UnterminatedRegion {
        /// 1-based line of the begin marker.
        line: usize,
        /// Artifact text after the marker.
        artifact: String,
    },
    /// A begin marker appears inside an open region.
    #[error("line {line}: region opened inside region started on line {outer}")]
    NestedRegion {
        /// 1-based line of the inner begin marker.
        line: usize,
        /// 1-based line of the enclosing begin marker.
        outer: usize,
    },
    /// An end marker appears outside any region.
    #[error("line {line}: end marker without a region")]
    UnmatchedEnd {
        /// 1-based line of the end marker.
        line: usize,
    },
    /// The artifact name is not recognized.
    #[error("unknown artifact '{0}'")]
    UnknownArtifact(String),
    /// A required artifact argument is absent.
    #[error("artifact '{artifact}' requires a {argument}")]
    MissingArgument {
        /// Artifact name.
        artifact: String,
        /// Description of the missing argument.
        argument: &'static str,
    },
    /// An artifact option is not recognized.
    #[error("artifact '{artifact}' does not accept '{argument}'")]
    InvalidArgument {
        /// Artifact name.
        artifact: String,
        /// The rejected argument.
        argument: String,
    },
    /// Rendering the artifact failed.
    #[error(transparent)]
    Generate(#[from] GenError),
    /// An error located in a specific file.
    #[error("{path}: {source}")]
    InFile {
        /// Target file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<CodeTagError>,
    },
}

/// Result of updating one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Regenerated text matched the file; nothing was written.
    Unchanged,
    /// The file was rewritten.
    Updated,
}

fn begin_spec(line: &str) -> Option<&str> {
    line.find(BEGIN_MARKER)
        .map(|idx| line[idx + BEGIN_MARKER.len()..].trim())
}

/// Regenerates every tagged region in `text`.
///
/// # Errors
///
/// Fails on malformed regions, unknown artifacts, or generator failures.
pub fn update_text(db: &Database, text: &str) -> Result<String, CodeTagError> {
    let mut out = String::with_capacity(text.len());
    let mut open: Option<(usize, &str)> = None;

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        if let Some(spec) = begin_spec(line) {
            if let Some((outer, _)) = open {
                return Err(CodeTagError::NestedRegion {
                    line: line_no,
                    outer,
                });
            }
            out.push_str(line);
            open = Some((line_no, spec));
        } else if line.contains(END_MARKER) {
            let Some((start, spec)) = open.take() else {
                return Err(CodeTagError::UnmatchedEnd { line: line_no });
            };
            let artifact = Artifact::parse(spec)?;
            debug!(line = start, artifact = spec, "regenerating region");
            let body = artifact.render(db)?;
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&body);
            if !body.is_empty() && !body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(line);
        } else if open.is_none() {
            out.push_str(line);
        }
    }

    match open {
        Some((line, spec)) => Err(CodeTagError::UnterminatedRegion {
            line,
            artifact: spec.to_string(),
        }),
        None => Ok(out),
    }
}

/// Regenerates the tagged regions of `path`, writing only on change.
///
/// # Errors
///
/// Fails on I/O errors or any [`update_text`] failure, reported against
/// `path`.
pub fn update_file(db: &Database, path: &Path) -> Result<UpdateOutcome, CodeTagError> {
    let io_err = |source| CodeTagError::Io {
        path: path.to_path_buf(),
        source,
    };
    let before = fs::read_to_string(path).map_err(io_err)?;
    let after = update_text(db, &before).map_err(|e| CodeTagError::InFile {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    if after == before {
        debug!(path = %path.display(), "no changes");
        return Ok(UpdateOutcome::Unchanged);
    }
    fs::write(path, after).map_err(io_err)?;
    info!(path = %path.display(), "updated generated regions");
    Ok(UpdateOutcome::Updated)
}

/// Updates every [`DEFAULT_UPDATE_TARGETS`] file under `src_root`.
///
/// # Errors
///
/// Stops at the first file that fails.
pub fn update_tree(
    db: &Database,
    src_root: &Path,
) -> Result<Vec<(PathBuf, UpdateOutcome)>, CodeTagError> {
    DEFAULT_UPDATE_TARGETS
        .iter()
        .map(|rel| {
            let path = src_root.join(rel);
            update_file(db, &path).map(|outcome| (path, outcome))
        })
        .collect()
}
