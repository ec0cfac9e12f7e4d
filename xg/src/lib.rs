#![allow(clippy::new_without_default)]

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

mod doom_def;
pub(crate) mod env;
mod lang;
pub mod level;
pub mod player;
pub mod thing;
pub mod xg;

pub use doom_def::{Card, DEFAULT_ARMOR_TYPE, MAXPLAYERS, SFX_OOF};
pub use env::switch::change_switch_texture;
pub use env::teleport::{line_teleport_exit, TeleportExit};
pub use glam;
pub use lang::english;
pub use level::{
    flags::LineDefFlags,
    map_data::MapData,
    map_defs::{LineDef, Sector, SectionKind, SideDef, SideSection},
    Level,
};
pub use log;
pub use player::Player;
pub use thing::{MapObjFlag, MapObject};
pub use xg::{
    activate::{activate_line, cross_line, hit_line, line_event, shoot_line, use_line},
    class::{ClassId, XG_CLASSES},
    line_type::{ActType, EventKind, LineType, LineTypeFlags2, LineTypeFlags3, RawLineType},
    resolver::{compile_lump, TypeResolver},
    LineCtx, XgLine,
};

#[derive(Debug)]
pub enum XgError {
    /// No definition for this line type id
    NotFound(i32),
    /// A compiled lump with a bad header or checksum
    BadLump(String),
    /// A text definition that could not be understood
    Parse(String),
    Io(std::io::Error),
}

impl Error for XgError {}

impl fmt::Display for XgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XgError::NotFound(id) => write!(f, "line type {} is not defined", id),
            XgError::BadLump(m) => write!(f, "bad line type lump: {}", m),
            XgError::Parse(m) => write!(f, "{}", m),
            XgError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl From<std::io::Error> for XgError {
    fn from(e: std::io::Error) -> Self {
        XgError::Io(e)
    }
}

impl From<toml::de::Error> for XgError {
    fn from(e: toml::de::Error) -> Self {
        XgError::Parse(e.to_string())
    }
}

impl From<bincode::Error> for XgError {
    fn from(e: bincode::Error) -> Self {
        XgError::BadLump(e.to_string())
    }
}

/// Map-wide switches for the line engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XgOptions {
    /// Every use, cross, shoot or hit passes the trigger test
    pub any_trigger: bool,
    /// How deep events may chain in to other events
    pub max_chain_depth: usize,
    /// Log developer diagnostics at info level instead of debug
    pub dev_messages: bool,
}

impl Default for XgOptions {
    fn default() -> Self {
        Self {
            any_trigger: false,
            max_chain_depth: 32,
            dev_messages: false,
        }
    }
}
