use argh::FromArgs;
use log::LevelFilter;

/// Headless driver for the XG line engine
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<LevelFilter>,
    /// path to a TOML file of line type definitions
    #[argh(option)]
    pub defs: Option<String>,
    /// path to a compiled line type lump
    #[argh(option)]
    pub lump: Option<String>,
    /// path to a scenario to run
    #[argh(option)]
    pub scenario: Option<String>,
    /// how many tics to run the scenario for, overriding the scenario
    #[argh(option)]
    pub tics: Option<u32>,
    /// write the loaded text definitions out as a compiled lump
    #[argh(option)]
    pub compile: Option<String>,
    /// print the resolved line type with this id
    #[argh(option)]
    pub dump_type: Option<i32>,
    /// log line engine diagnostics at info level
    #[argh(switch)]
    pub dev: bool,
    /// print timings when done, needs the hprof feature
    #[argh(switch)]
    pub profile: bool,
}
