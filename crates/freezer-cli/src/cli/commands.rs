//! Command builders for the CLI.

use clap::Command;

use super::args::*;

fn with_compiler_args(cmd: Command) -> Command {
    cmd.arg(compiler_arg())
        .arg(compiler_args_arg())
        .arg(verbose_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("freezer")
        .about("Embed modules as frozen code and generate the native dispatch tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(freeze_command())
        .subcommand(dump_command())
}

/// Freeze modules and write the generated C++ sources.
pub fn freeze_command() -> Command {
    let cmd = Command::new("freeze")
        .about("Freeze modules and write the generated sources")
        .after_help(
            r#"EXAMPLES:
  freezer freeze build/gen lib/_builtins.py lib/_io.py --compiler pyro-compile
  FREEZER_COMPILER=pyro-compile freezer freeze build/gen lib/*.py -v"#,
        )
        .arg(out_dir_arg())
        .arg(files_arg());

    with_compiler_args(cmd)
}

/// Show one module after stub rewriting.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show a module's code tree after stub rewriting")
        .after_help(
            r#"EXAMPLES:
  freezer dump lib/_io.py --compiler pyro-compile"#,
        )
        .arg(file_arg());

    with_compiler_args(cmd)
}
