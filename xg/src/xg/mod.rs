//! The extended line engine. Lines given a line type carry an `XgLine` which
//! is driven by events from the game (`activate`), by other lines, and by the
//! per-tic ticker (`thinker`).

pub mod activate;
pub mod class;
pub mod defs;
pub mod functions;
pub mod line_type;
pub mod params;
pub mod resolver;
pub mod thinker;
pub mod traverse;

#[cfg(test)]
mod tests;

use log::{info, warn};

use crate::xg::class::ClassId;
use crate::xg::functions::start_chain_sequence;
use crate::xg::line_type::{EventKind, LineType, LineTypeFlags2};
use crate::xg::resolver::TypeResolver;
use crate::{Level, XgOptions};

/// Developer diagnostics. Shown at info level when the map asks for them.
macro_rules! xg_dev {
    ($level:expr, $($arg:tt)+) => {
        if $level.xg.options.dev_messages {
            log::info!($($arg)+)
        } else {
            log::debug!($($arg)+)
        }
    };
}
pub(crate) use xg_dev;

/// Run time state of a line with a line type
#[derive(Debug, Clone, PartialEq)]
pub struct XgLine {
    /// Ignores every event and is skipped by the ticker
    pub disabled: bool,
    pub active: bool,
    /// Tics since the last state change
    pub timer: i32,
    /// Tics since the ticker last fired
    pub ticker_timer: i32,
    /// Chain sequence cursor, numbered from 1
    pub ch_idx: usize,
    /// Seconds until the next chain sequence step
    pub ch_timer: f32,
    /// The thing that last changed the state
    pub activator: Option<usize>,
    pub info: LineType,
}

impl XgLine {
    pub fn new(info: LineType) -> Self {
        Self {
            disabled: false,
            active: info.has_flag2(LineTypeFlags2::Active),
            timer: 0,
            ticker_timer: 0,
            ch_idx: 0,
            ch_timer: 0.0,
            activator: None,
            info,
        }
    }
}

/// Where a line's XG state lives. Chained types are evaluated against a
/// short lived copy on the scratch stack so the real line keeps its own
/// state, while map data is still read from and written to `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCtx {
    pub line: usize,
    pub scratch: Option<usize>,
}

impl LineCtx {
    pub fn line(line: usize) -> Self {
        Self { line, scratch: None }
    }
}

/// Everything a class function gets told about why it is running
#[derive(Debug, Clone, Copy)]
pub struct XgCall<'a> {
    pub info: &'a LineType,
    pub ctx: LineCtx,
    pub side: usize,
    pub activator: Option<usize>,
    pub ev: EventKind,
}

pub struct XgState {
    /// Indexed by line number
    pub lines: Vec<Option<XgLine>>,
    pub(crate) scratch: Vec<XgLine>,
    /// Nesting of `line_event` calls
    pub(crate) depth: usize,
    pub resolver: TypeResolver,
    pub options: XgOptions,
}

impl XgState {
    pub fn new(line_count: usize, resolver: TypeResolver, options: XgOptions) -> Self {
        Self {
            lines: vec![None; line_count],
            scratch: Vec::new(),
            depth: 0,
            resolver,
            options,
        }
    }

    pub fn get(&self, ctx: LineCtx) -> Option<&XgLine> {
        match ctx.scratch {
            Some(i) => self.scratch.get(i),
            None => self.lines.get(ctx.line).and_then(Option::as_ref),
        }
    }

    pub fn get_mut(&mut self, ctx: LineCtx) -> Option<&mut XgLine> {
        match ctx.scratch {
            Some(i) => self.scratch.get_mut(i),
            None => self.lines.get_mut(ctx.line).and_then(Option::as_mut),
        }
    }
}

/// Give the line a fresh state of type `id`. If the type can't be resolved
/// the line is left as it was and false is returned.
pub fn set_line_type(level: &mut Level, ctx: LineCtx, id: i32) -> bool {
    let info = match level.xg.resolver.resolve(id) {
        Ok(info) => info,
        Err(e) => {
            if id != 0 {
                xg_dev!(level, "Line {}: {e}", ctx.line);
            }
            return false;
        }
    };

    let xg = XgLine::new(info);
    let starts_chain = xg.active && xg.info.class == ClassId::ChainSequence;
    match ctx.scratch {
        Some(i) => match level.xg.scratch.get_mut(i) {
            Some(scratch) => *scratch = xg,
            None => return false,
        },
        None => {
            let Ok(special) = i16::try_from(id) else {
                warn!("Line {}: type {id} does not fit in a line special", ctx.line);
                return false;
            };
            let Some(line) = level.map_data.linedefs_mut().get_mut(ctx.line) else {
                return false;
            };
            line.special = special;
            level.xg.lines[ctx.line] = Some(xg);
        }
    }
    xg_dev!(level, "Line {}: type set to {id}", ctx.line);

    if starts_chain {
        if let Some(info) = level.xg.get(ctx).map(|xg| xg.info.clone()) {
            start_chain_sequence(level, ctx, &info);
        }
    }
    true
}

/// Assign line types to every line with a special. Lines whose special
/// doesn't resolve are left without XG state.
pub fn init(level: &mut Level) {
    level.xg.lines = vec![None; level.map_data.linedefs().len()];
    level.xg.scratch.clear();
    level.xg.depth = 0;

    let mut count = 0;
    for i in 0..level.map_data.linedefs().len() {
        let special = level.map_data.linedefs()[i].special as i32;
        if special != 0 && set_line_type(level, LineCtx::line(i), special) {
            count += 1;
        }
    }
    info!("{}: {count} lines have XG types", level.map_data.name());
}
