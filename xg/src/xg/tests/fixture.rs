//! A small map, a recording game and a sound channel to check lines against.
//!
//! Line `i` runs north from `(64 * i, 0)` to `(64 * i, 64)` with sector 0 in
//! front. Sectors 1 and 2 share tag 5 and special 9.

use std::sync::mpsc::channel;

use glam::Vec2;
use math::Angle;
use sound_nosnd::{SfxId, MusId, SndServerRx};
use sound_traits::SoundAction;
use xg_traits::{ExitTarget, GameTraits, Skill};

use crate::level::map_data::MapData;
use crate::level::map_defs::{LineDef, Sector, SideDef};
use crate::thing::{MapObjFlag, MapObject};
use crate::xg::activate::{cross_line, use_line};
use crate::xg::class::ClassId;
use crate::xg::line_type::{trigger_flag, ActorClass, EventKind, LineTypeFlags2, RawLineType};
use crate::xg::resolver::TypeResolver;
use crate::xg::{self, XgLine};
use crate::{Level, XgOptions};

pub const PLAYER_KIND: i32 = 1;
pub const IMP_KIND: i32 = 3001;
pub const SWITCH_OFF: usize = 10;
pub const SWITCH_ON: usize = 11;

/// Records everything the line engine asks of the game
#[derive(Default)]
pub struct TestGame {
    pub skill: Skill,
    pub netgame: bool,
    pub deathmatch: u8,
    pub maps: Vec<String>,
    pub exits: Vec<ExitTarget>,
    pub commands: Vec<String>,
    pub teleports: Vec<(usize, Vec2, bool)>,
    pub block_teleports: bool,
    pub exploded: Vec<usize>,
}

impl GameTraits for TestGame {
    fn skill(&self) -> Skill {
        self.skill
    }

    fn netgame(&self) -> bool {
        self.netgame
    }

    fn deathmatch(&self) -> u8 {
        self.deathmatch
    }

    fn episode(&self) -> usize {
        1
    }

    fn map_exists(&self, map_id: &str) -> bool {
        self.maps.iter().any(|m| m == map_id)
    }

    fn compose_map_id(&self, episode: usize, map: usize) -> String {
        format!("E{episode}M{map}")
    }

    fn named_exit_target(&self, name: &str) -> String {
        format!("{name}-exit")
    }

    fn leave_map(&mut self, target: ExitTarget) {
        self.exits.push(target);
    }

    fn execute(&mut self, command: &str) -> bool {
        self.commands.push(command.to_string());
        true
    }

    fn teleport_move(&mut self, mobj: usize, x: f32, y: f32, telefrag: bool) -> bool {
        if self.block_teleports {
            return false;
        }
        self.teleports.push((mobj, Vec2::new(x, y), telefrag));
        true
    }

    fn explode_missile(&mut self, mobj: usize) {
        self.exploded.push(mobj);
    }
}

/// A line type used by the player from the front, doing its function when
/// activated
pub fn line_type(id: i32, class: ClassId) -> RawLineType {
    RawLineType {
        id,
        line_class: class as u8,
        flags: trigger_flag(EventKind::Use, ActorClass::Player, false)
            | trigger_flag(EventKind::Use, ActorClass::Player, true),
        flags2: LineTypeFlags2::WhenActivated as u32,
        ..RawLineType::default()
    }
}

/// A command line type, handy for counting function calls
pub fn command_type(id: i32, command: &str) -> RawLineType {
    let mut raw = line_type(id, ClassId::Command);
    raw.sparm[0] = command.to_string();
    raw
}

pub fn test_map(lines: &[(i16, i16)]) -> MapData {
    let sectors = vec![
        Sector::new(0, 0.0, 128.0, 1, 2, 160, 0, 0),
        Sector::new(1, 8.0, 128.0, 1, 2, 100, 9, 5),
        Sector::new(2, 16.0, 96.0, 1, 2, 250, 9, 5),
    ];
    let mut linedefs = Vec::new();
    let mut sidedefs = Vec::new();
    for (i, (special, tag)) in lines.iter().enumerate() {
        let x = 64.0 * i as f32;
        sidedefs.push(SideDef::new(0, Some(SWITCH_OFF), Some(1), Some(2)));
        linedefs.push(LineDef::new(
            Vec2::new(x, 0.0),
            Vec2::new(x, 64.0),
            0,
            *special,
            *tag,
            i,
            None,
        ));
    }

    let mut map = MapData::new("TEST");
    map.load(linedefs, sidedefs, sectors).unwrap();
    map
}

pub struct Fixture {
    pub level: Level,
    pub game: TestGame,
    pub sounds: SndServerRx,
    pub player: usize,
}

impl Fixture {
    /// `lines` are (special, tag) pairs
    pub fn new(lines: &[(i16, i16)], types: Vec<RawLineType>) -> Self {
        Self::with_map(test_map(lines), types)
    }

    pub fn with_map(map: MapData, types: Vec<RawLineType>) -> Self {
        let mut resolver = TypeResolver::new();
        for raw in types {
            resolver.insert(raw);
        }
        let (tx, rx) = channel();
        let mut level = Level::new(map, vec![SWITCH_OFF, SWITCH_ON], tx, resolver, XgOptions::default());

        let player = level.spawn_map_object(MapObject::new(
            PLAYER_KIND,
            Vec2::new(32.0, 32.0),
            0.0,
            Angle::new(0.0),
            MapObjFlag::Solid as u32 | MapObjFlag::Shootable as u32,
            100,
            0,
        ));
        level.set_player(0, player);
        xg::init(&mut level);

        Self {
            level,
            game: TestGame::default(),
            sounds: rx,
            player,
        }
    }

    pub fn spawn(&mut self, kind: i32, xy: Vec2, flags: u32, sector: usize) -> usize {
        self.level
            .spawn_map_object(MapObject::new(kind, xy, 0.0, Angle::new(0.0), flags, 60, sector))
    }

    pub fn use_line(&mut self, line: usize) -> bool {
        use_line(&mut self.level, &mut self.game, line, 0, self.player)
    }

    pub fn use_by(&mut self, line: usize, side: usize, thing: usize) -> bool {
        use_line(&mut self.level, &mut self.game, line, side, thing)
    }

    pub fn cross_line(&mut self, line: usize) -> bool {
        cross_line(&mut self.level, &mut self.game, line, 0, self.player)
    }

    pub fn xg(&self, line: usize) -> &XgLine {
        self.level.xg.lines[line].as_ref().unwrap()
    }

    pub fn xg_mut(&mut self, line: usize) -> &mut XgLine {
        self.level.xg.lines[line].as_mut().unwrap()
    }

    pub fn tic(&mut self, tics: usize) {
        for _ in 0..tics {
            self.level.tic(&mut self.game);
        }
    }

    pub fn sounds(&self) -> Vec<SoundAction<SfxId, MusId>> {
        self.sounds.try_iter().collect()
    }
}
