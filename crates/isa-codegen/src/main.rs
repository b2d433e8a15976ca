//! CLI entry point for the isa-codegen binary.

use std::env;
use std::path::PathBuf;

use clap::Parser;
use isa_codegen::{update_tree, CodeTagError, GenError, GenKind, UpdateOutcome};
use isa_db::{Database, DbError};
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the source root for `--update-files`.
const SRC_DIR_ENV: &str = "HLSL_SRC_DIR";

#[derive(Parser, Debug)]
#[command(
    name = "isa-codegen",
    version,
    about = "Generate sources and documentation from an instruction-set database"
)]
struct Args {
    /// Path to the JSON instruction-set database
    #[arg(long)]
    db: PathBuf,
    /// Whole-file output to print on stdout
    #[arg(long = "gen", value_enum, required_unless_present = "update_files")]
    generator: Option<GenKind>,
    /// Regenerate the tagged regions of the default target files
    #[arg(long)]
    update_files: bool,
    /// Source root for --update-files (defaults to $HLSL_SRC_DIR)
    #[arg(long)]
    src_dir: Option<PathBuf>,
    /// Log generator progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Generate(#[from] GenError),
    #[error(transparent)]
    CodeTags(#[from] CodeTagError),
    #[error("environment variable HLSL_SRC_DIR is not defined and --src-dir was not given")]
    MissingEnvironment,
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_src_dir(flag: Option<PathBuf>, env_value: Option<PathBuf>) -> Result<PathBuf, CliError> {
    flag.or(env_value).ok_or(CliError::MissingEnvironment)
}

fn run(args: Args) -> Result<(), CliError> {
    let db = Database::load(&args.db)?;
    debug!(
        instructions = db.instructions().len(),
        enums = db.enums().len(),
        "database loaded"
    );

    if let Some(kind) = args.generator {
        print!("{}", kind.render(&db)?);
    }

    if args.update_files {
        let src_dir = resolve_src_dir(args.src_dir, env::var_os(SRC_DIR_ENV).map(PathBuf::from))?;
        for (path, outcome) in update_tree(&db, &src_dir)? {
            let status = match outcome {
                UpdateOutcome::Unchanged => "unchanged",
                UpdateOutcome::Updated => "updated",
            };
            println!("{status}: {}", path.display());
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let exit_code = match run(args) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("isa-codegen").chain(argv.iter().copied()))
    }

    #[test]
    fn parses_generator_kind() {
        let args = parse(&["--db", "db.json", "--gen", "inst-header"]).unwrap();
        assert_eq!(args.db, PathBuf::from("db.json"));
        assert_eq!(args.generator, Some(GenKind::InstHeader));
        assert!(!args.update_files);
        assert!(!args.verbose);
    }

    #[test]
    fn parses_update_mode_with_source_root() {
        let args = parse(&["--db", "db.json", "--update-files", "--src-dir", "/src", "-v"]).unwrap();
        assert_eq!(args.generator, None);
        assert!(args.update_files);
        assert_eq!(args.src_dir, Some(PathBuf::from("/src")));
        assert!(args.verbose);
    }

    #[test]
    fn requires_an_action() {
        assert!(parse(&["--db", "db.json"]).is_err());
    }

    #[test]
    fn requires_a_database() {
        assert!(parse(&["--gen", "enums"]).is_err());
    }

    #[test]
    fn rejects_unknown_generator() {
        assert!(parse(&["--db", "db.json", "--gen", "docs-spec"]).is_err());
    }

    #[test]
    fn source_root_prefers_flag_over_environment() {
        let resolved =
            resolve_src_dir(Some(PathBuf::from("/flag")), Some(PathBuf::from("/env"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/flag"));
        let resolved = resolve_src_dir(None, Some(PathBuf::from("/env"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/env"));
        assert!(matches!(
            resolve_src_dir(None, None),
            Err(CliError::MissingEnvironment)
        ));
    }
}
