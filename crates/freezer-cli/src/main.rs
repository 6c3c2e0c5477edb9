#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cli;
mod commands;
mod logging;

use cli::{DumpParams, FreezeParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("freeze", m)) => {
            let params = FreezeParams::from_matches(m);
            logging::init(params.verbose);
            commands::freeze::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            logging::init(params.verbose);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
