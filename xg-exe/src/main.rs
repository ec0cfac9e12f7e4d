//! Headless driver for the XG line engine. Loads line type definitions,
//! compiles or inspects them, and runs scenarios against them.

mod cli;
mod config;
mod scenario;

use std::error::Error;
use std::fs;
use std::path::Path;

use cli::CLIOptions;
use log::{info, warn};
use mimalloc::MiMalloc;
use simplelog::TermLogger;
use xg::{TypeResolver, compile_lump};

use crate::config::UserConfig;
use crate::scenario::Scenario;

const BASE_DIR: &str = "xg-engine/";

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();
    let mut user_config = UserConfig::load();
    user_config.sync_cli(&mut options);

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Warn),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    user_config.write();

    let mut resolver = TypeResolver::new();
    if let Some(lump) = &options.lump {
        let count = resolver.load_lump_file(Path::new(lump))?;
        info!("Loaded {count} line types from {lump}");
    }
    if let Some(defs) = &options.defs {
        let count = resolver.load_text_file(Path::new(defs))?;
        info!("Loaded {count} line types from {defs}");
    }

    let mut did_something = false;
    if let Some(out) = &options.compile {
        let types: Vec<_> = resolver.text_types().into_iter().cloned().collect();
        if types.is_empty() {
            warn!("No text definitions loaded, nothing to compile");
        }
        fs::write(out, compile_lump(&types)?)?;
        info!("Wrote {} line types to {out}", types.len());
        did_something = true;
    }

    if let Some(id) = options.dump_type {
        println!("{:#?}", resolver.resolve(id)?);
        did_something = true;
    }

    if let Some(path) = &options.scenario {
        let scenario = Scenario::load(Path::new(path))?;
        let outcome = scenario.run(resolver, user_config.xg.clone(), options.tics)?;
        outcome.report();
        did_something = true;
    }

    if options.profile {
        #[cfg(feature = "hprof")]
        coarse_prof::write(&mut std::io::stdout())?;
        #[cfg(not(feature = "hprof"))]
        warn!("Built without the hprof feature, no timings to show");
    }

    if !did_something {
        warn!("Nothing to do, give --scenario, --compile or --dump-type");
    }
    Ok(())
}
