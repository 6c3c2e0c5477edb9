//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::dump::DumpArgs;
use crate::commands::freeze::FreezeArgs;

/// External compiler invocation shared by all commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerParams {
    pub program: String,
    pub args: Vec<String>,
}

impl CompilerParams {
    fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program: m
                .get_one::<String>("compiler")
                .cloned()
                .expect("clap enforces --compiler"),
            args: m
                .get_many::<String>("compiler_args")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        }
    }
}

pub struct FreezeParams {
    pub out_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub compiler: CompilerParams,
    pub verbose: u8,
}

impl FreezeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            out_dir: m
                .get_one::<PathBuf>("out_dir")
                .cloned()
                .expect("clap enforces DIR"),
            files: m
                .get_many::<PathBuf>("files")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            compiler: CompilerParams::from_matches(m),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<FreezeParams> for FreezeArgs {
    fn from(p: FreezeParams) -> Self {
        Self {
            out_dir: p.out_dir,
            files: p.files,
            compiler: p.compiler.program,
            compiler_args: p.compiler.args,
        }
    }
}

pub struct DumpParams {
    pub file: PathBuf,
    pub compiler: CompilerParams,
    pub verbose: u8,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m
                .get_one::<PathBuf>("file")
                .cloned()
                .expect("clap enforces FILE"),
            compiler: CompilerParams::from_matches(m),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            file: p.file,
            compiler: p.compiler.program,
            compiler_args: p.compiler.args,
        }
    }
}
