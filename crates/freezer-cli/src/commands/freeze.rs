//! Freeze modules and write the generated sources.

use std::path::PathBuf;

use freezer_bytecode::Marshal;
use freezer_compiler::{CommandFrontend, PipelineConfig, freeze};

pub struct FreezeArgs {
    pub out_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub compiler: String,
    pub compiler_args: Vec<String>,
}

pub fn run(args: FreezeArgs) {
    let frontend = CommandFrontend::new(&args.compiler).args(&args.compiler_args);
    let config = PipelineConfig::new(args.out_dir, args.files);

    if let Err(e) = freeze(&config, &frontend, &Marshal) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
