//! Show one module after stub rewriting, and the blob it serializes to.

use std::path::PathBuf;

use freezer_bytecode::{Marshal, Serializer, dump, dump_blob};
use freezer_compiler::{Collector, CommandFrontend, DispatchTables};

pub struct DumpArgs {
    pub file: PathBuf,
    pub compiler: String,
    pub compiler_args: Vec<String>,
}

pub fn run(args: DumpArgs) {
    let frontend = CommandFrontend::new(&args.compiler).args(&args.compiler_args);
    let mut collector = Collector::new(&frontend, &Marshal);

    let loaded = match collector.load(&args.file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let mut header = format!("module {}", loaded.name.name);
    if loaded.name.is_package {
        header.push_str(" (package)");
    }
    if loaded.has_init_hook {
        header.push_str(" (init hook)");
    }
    println!("# {header}\n");
    print!("{}", dump(&loaded.code));

    let blob = match dump_blob(&Marshal.serialize(&loaded.code)) {
        Ok(blob) => blob,
        Err(e) => {
            eprintln!("error: serialized module does not read back: {}", e);
            std::process::exit(1);
        }
    };
    print!("\n{blob}");
    print!("{}", render_tables(collector.tables()));
}

fn render_tables(tables: &DispatchTables) -> String {
    let mut out = String::new();
    for (title, ids) in [
        ("builtins", tables.builtins().collect::<Vec<_>>()),
        ("intrinsics", tables.intrinsics().collect::<Vec<_>>()),
    ] {
        if ids.is_empty() {
            continue;
        }
        out.push_str(&format!("\n[{title}]\n"));
        for (index, id) in ids.iter().enumerate() {
            out.push_str(&format!("{index:>3}  {id}\n"));
        }
    }
    out
}
