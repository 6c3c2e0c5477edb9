//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Output directory (positional).
pub fn out_dir_arg() -> Arg {
    Arg::new("out_dir")
        .value_name("DIR")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Directory where the generated files are written")
}

/// Source files to freeze (positional, one or more).
pub fn files_arg() -> Arg {
    Arg::new("files")
        .value_name("FILES")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(PathBuf))
        .help("Module source files, in the order their functions are numbered")
}

/// Single source file (positional).
pub fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Module source file")
}

/// External compiler program (--compiler).
pub fn compiler_arg() -> Arg {
    Arg::new("compiler")
        .long("compiler")
        .value_name("PROGRAM")
        .env("FREEZER_COMPILER")
        .required(true)
        .help("Program that compiles one module to a JSON code record")
}

/// Extra compiler arguments (--compiler-arg, repeatable).
pub fn compiler_args_arg() -> Arg {
    Arg::new("compiler_args")
        .long("compiler-arg")
        .value_name("ARG")
        .action(ArgAction::Append)
        .allow_hyphen_values(true)
        .help("Argument passed to the compiler before its own flags")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for progress, -vv for every stub)")
}
