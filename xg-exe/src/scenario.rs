//! Scenarios describe a small map, the things in it and a timeline of line
//! events. Running one builds a level, feeds it the events and ticks it
//! headless, with the game side of things stood in by `HeadlessGame`.
//!
//! ```toml
//! name = "E1M1"
//! tics = 70
//!
//! [[sector]]
//! floor = 0.0
//! ceiling = 128.0
//!
//! [[side]]
//! sector = 0
//! middle = 1
//!
//! [[line]]
//! v1 = [0.0, 0.0]
//! v2 = [0.0, 64.0]
//! special = 1200
//! front = 0
//!
//! [[thing]]
//! kind = 1
//! xy = [32.0, 32.0]
//! player = 0
//!
//! [[event]]
//! tic = 0
//! kind = "use"
//! line = 0
//! ```

use std::{error::Error, fs, path::Path};

use glam::Vec2;
use log::{debug, info, warn};
use math::Angle;
use serde::Deserialize;
use sound_nosnd::{Played, Snd};
use sound_traits::{SoundServer, SoundServerTic};
use xg::{
    Level, LineDef, MapData, MapObjFlag, MapObject, Sector, SideDef, TypeResolver, XgOptions,
    cross_line, hit_line, shoot_line, use_line,
};
use xg_traits::{ExitTarget, GameTraits, Skill};

/// Names accepted in a thing's `flags` list
const THING_FLAGS: &[(&str, MapObjFlag)] = &[
    ("special", MapObjFlag::Special),
    ("solid", MapObjFlag::Solid),
    ("shootable", MapObjFlag::Shootable),
    ("nosector", MapObjFlag::Nosector),
    ("teleport", MapObjFlag::Teleport),
    ("missile", MapObjFlag::Missile),
    ("corpse", MapObjFlag::Corpse),
    ("count_kill", MapObjFlag::CountKill),
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectorDef {
    pub floor: f32,
    pub ceiling: f32,
    #[serde(default)]
    pub floorpic: usize,
    #[serde(default)]
    pub ceilpic: usize,
    #[serde(default = "full_light")]
    pub light: usize,
    #[serde(default)]
    pub special: i16,
    #[serde(default)]
    pub tag: i16,
}

fn full_light() -> usize {
    255
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideDefDef {
    pub sector: usize,
    #[serde(default)]
    pub top: Option<usize>,
    #[serde(default)]
    pub middle: Option<usize>,
    #[serde(default)]
    pub bottom: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineDefDef {
    pub v1: [f32; 2],
    pub v2: [f32; 2],
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub special: i16,
    #[serde(default)]
    pub tag: i16,
    pub front: usize,
    #[serde(default)]
    pub back: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThingDef {
    pub kind: i32,
    pub xy: [f32; 2],
    /// Degrees
    #[serde(default)]
    pub angle: f32,
    #[serde(default = "full_health")]
    pub health: i32,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub sector: usize,
    /// Player number driving this thing
    #[serde(default)]
    pub player: Option<usize>,
}

fn full_health() -> i32 {
    100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDefKind {
    Use,
    Cross,
    Shoot,
    Hit,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventDef {
    pub tic: u32,
    pub kind: EventDefKind,
    pub line: usize,
    #[serde(default)]
    pub side: usize,
    /// Index in to the scenario's things
    #[serde(default)]
    pub thing: usize,
}

fn default_name() -> String {
    "SCENARIO".to_string()
}

fn default_skill() -> String {
    "medium".to_string()
}

fn default_tics() -> u32 {
    35
}

fn first_episode() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    /// Switch materials in off/on pairs
    #[serde(default)]
    pub switches: Vec<usize>,
    #[serde(default = "default_skill")]
    pub skill: String,
    #[serde(default)]
    pub netgame: bool,
    #[serde(default)]
    pub deathmatch: u8,
    #[serde(default = "first_episode")]
    pub episode: usize,
    /// Map ids the game knows about
    #[serde(default)]
    pub maps: Vec<String>,
    /// Where a secret exit goes
    #[serde(default)]
    pub secret_exit: String,
    #[serde(default = "default_tics")]
    pub tics: u32,
    /// Line type definitions carried with the scenario, in the same format
    /// as a definitions file
    #[serde(default)]
    pub defs: String,
    #[serde(default, rename = "sector")]
    pub sectors: Vec<SectorDef>,
    #[serde(default, rename = "side")]
    pub sides: Vec<SideDefDef>,
    #[serde(default, rename = "line")]
    pub lines: Vec<LineDefDef>,
    #[serde(default, rename = "thing")]
    pub things: Vec<ThingDef>,
    #[serde(default, rename = "event")]
    pub events: Vec<EventDef>,
}

/// Stands in for the game while a scenario runs. Everything the line engine
/// asks for is logged and kept.
#[derive(Debug, Default)]
pub struct HeadlessGame {
    pub skill: Skill,
    pub netgame: bool,
    pub deathmatch: u8,
    pub episode: usize,
    pub maps: Vec<String>,
    pub secret_exit: String,
    pub exit: Option<ExitTarget>,
    pub commands: Vec<String>,
    pub exploded: Vec<usize>,
}

impl GameTraits for HeadlessGame {
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
        self.episode
    }

    fn map_exists(&self, map_id: &str) -> bool {
        self.maps.iter().any(|m| m.eq_ignore_ascii_case(map_id))
    }

    fn compose_map_id(&self, episode: usize, map: usize) -> String {
        format!("E{episode}M{map}")
    }

    fn named_exit_target(&self, name: &str) -> String {
        if self.secret_exit.is_empty() {
            name.to_string()
        } else {
            self.secret_exit.clone()
        }
    }

    fn leave_map(&mut self, target: ExitTarget) {
        info!("Leaving map: {target:?}");
        self.exit = Some(target);
    }

    fn execute(&mut self, command: &str) -> bool {
        info!("Console: {command}");
        self.commands.push(command.to_string());
        true
    }

    fn teleport_move(&mut self, mobj: usize, x: f32, y: f32, telefrag: bool) -> bool {
        debug!("Teleport {mobj} to ({x}, {y}), telefrag: {telefrag}");
        true
    }

    fn explode_missile(&mut self, mobj: usize) {
        info!("Exploding {mobj}");
        self.exploded.push(mobj);
    }
}

/// What is left after a scenario has run
pub struct Outcome {
    pub level: Level,
    pub game: HeadlessGame,
    pub played: Vec<Played>,
}

fn thing_flags(names: &[String]) -> Result<u32, String> {
    names.iter().try_fold(0, |bits, name| {
        THING_FLAGS
            .iter()
            .find(|(n, _)| *n == name.as_str())
            .map(|(_, f)| bits | *f as u32)
            .ok_or_else(|| format!("unknown thing flag {name}"))
    })
}

impl Scenario {
    pub fn parse(text: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn map_data(&self) -> Result<MapData, Box<dyn Error>> {
        let sectors = self
            .sectors
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Sector::new(
                    i as u32,
                    s.floor,
                    s.ceiling,
                    s.floorpic,
                    s.ceilpic,
                    s.light,
                    s.special,
                    s.tag,
                )
            })
            .collect();
        let sides = self
            .sides
            .iter()
            .map(|s| SideDef::new(s.sector, s.top, s.middle, s.bottom))
            .collect();
        let lines = self
            .lines
            .iter()
            .map(|l| {
                LineDef::new(
                    Vec2::from(l.v1),
                    Vec2::from(l.v2),
                    l.flags,
                    l.special,
                    l.tag,
                    l.front,
                    l.back,
                )
            })
            .collect();

        let mut map = MapData::new(&self.name);
        map.load(lines, sides, sectors)?;
        Ok(map)
    }

    fn game(&self) -> Result<HeadlessGame, Box<dyn Error>> {
        Ok(HeadlessGame {
            skill: self.skill.parse()?,
            netgame: self.netgame,
            deathmatch: self.deathmatch,
            episode: self.episode,
            maps: self.maps.clone(),
            secret_exit: self.secret_exit.clone(),
            ..HeadlessGame::default()
        })
    }

    /// Build the level and run it for `tics`, or the scenario's own count.
    /// Stops early once a line ends the map.
    pub fn run(
        &self,
        mut resolver: TypeResolver,
        options: XgOptions,
        tics: Option<u32>,
    ) -> Result<Outcome, Box<dyn Error>> {
        if !self.defs.is_empty() {
            let count = resolver.load_text(&self.defs)?;
            info!("Loaded {count} line types from scenario {}", self.name);
        }
        let mut game = self.game()?;
        let map = self.map_data()?;

        let mut snd = Snd::new()?;
        let tx = snd.init()?;
        let mut level = Level::new(map, self.switches.clone(), tx, resolver, options);

        let mut things = Vec::with_capacity(self.things.len());
        for def in &self.things {
            let z = level
                .map_data
                .sectors()
                .get(def.sector)
                .map(|s| s.floorheight)
                .unwrap_or_default();
            let mobj = MapObject::new(
                def.kind,
                Vec2::from(def.xy),
                z,
                Angle::from_degrees(def.angle),
                thing_flags(&def.flags)?,
                def.health,
                def.sector,
            );
            let idx = level.spawn_map_object(mobj);
            if let Some(pnum) = def.player {
                level.set_player(pnum, idx);
            }
            things.push(idx);
        }
        xg::xg::init(&mut level);

        let tics = tics.unwrap_or(self.tics);
        info!("Running {} for {tics} tics", self.name);
        for tic in 0..tics {
            for ev in self.events.iter().filter(|e| e.tic == tic) {
                let Some(&thing) = things.get(ev.thing) else {
                    warn!("Tic {tic}: event names missing thing {}", ev.thing);
                    continue;
                };
                if ev.line >= level.map_data.linedefs().len() {
                    warn!("Tic {tic}: event names missing line {}", ev.line);
                    continue;
                }
                let accepted = match ev.kind {
                    EventDefKind::Use => use_line(&mut level, &mut game, ev.line, ev.side, thing),
                    EventDefKind::Cross => cross_line(&mut level, &mut game, ev.line, ev.side, thing),
                    EventDefKind::Shoot => shoot_line(&mut level, &mut game, ev.line, ev.side, thing),
                    EventDefKind::Hit => hit_line(&mut level, &mut game, ev.line, ev.side, thing),
                };
                debug!("Tic {tic}: {:?} line {} accepted: {accepted}", ev.kind, ev.line);
            }
            if game.exit.is_some() {
                break;
            }
            level.tic(&mut game);
            snd.drain();
        }
        snd.drain();

        Ok(Outcome {
            level,
            game,
            played: snd.history().to_vec(),
        })
    }
}

impl Outcome {
    pub fn report(&self) {
        info!("Stopped at tic {}", self.level.level_time);
        for (i, xg) in self.level.xg.lines.iter().enumerate() {
            let Some(xg) = xg else {
                continue;
            };
            info!(
                "Line {i}: type {} ({}), active: {}, disabled: {}, count: {}, timer: {}",
                xg.info.id,
                xg.info.class.info().name,
                xg.active,
                xg.disabled,
                xg.info.act_count,
                xg.timer
            );
        }
        for (pnum, player) in self.level.players.iter().enumerate() {
            if !self.level.player_in_game[pnum] {
                continue;
            }
            info!(
                "Player {pnum}: armor {}, cards {:?}, message {:?}",
                player.armorpoints, player.cards, player.message
            );
        }
        if !self.played.is_empty() {
            info!("{} sounds played", self.played.len());
        }
        if let Some(exit) = &self.game.exit {
            info!("Exit: {exit:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use sound_nosnd::Played;
    use xg::{TypeResolver, XgOptions};
    use xg_traits::ExitTarget;

    use super::Scenario;

    const SCENARIO: &str = r#"
        name = "E1M1"
        tics = 10
        maps = ["E1M1", "E1M2"]
        defs = '''
            [[line_type]]
            id = 1200
            class = "key"
            triggers = ["player_use_a"]
            flags = ["when_activated"]
            count = 1
            params = { give = "blue_card|red_skull" }

            [[line_type]]
            id = 1201
            class = "command"
            triggers = ["player_cross_a"]
            flags = ["when_activated"]
            act = { sound = 40 }
            params = { command = "echo hello" }

            [[line_type]]
            id = 1202
            class = "leave_map"
            triggers = ["player_use_a"]
            flags = ["when_activated"]
            params = { map = 2 }
        '''

        [[sector]]
        floor = 0.0
        ceiling = 128.0

        [[side]]
        sector = 0
        middle = 1

        [[side]]
        sector = 0
        middle = 1

        [[side]]
        sector = 0
        middle = 1

        [[line]]
        v1 = [0.0, 0.0]
        v2 = [0.0, 64.0]
        special = 1200
        front = 0

        [[line]]
        v1 = [64.0, 0.0]
        v2 = [64.0, 64.0]
        special = 1201
        front = 1

        [[line]]
        v1 = [128.0, 0.0]
        v2 = [128.0, 64.0]
        special = 1202
        front = 2

        [[thing]]
        kind = 1
        xy = [32.0, 32.0]
        flags = ["solid", "shootable"]
        player = 0

        [[event]]
        tic = 0
        kind = "use"
        line = 0

        [[event]]
        tic = 1
        kind = "use"
        line = 0

        [[event]]
        tic = 2
        kind = "cross"
        line = 1

        [[event]]
        tic = 4
        kind = "use"
        line = 2
    "#;

    #[test]
    fn runs_until_the_map_is_left() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        let outcome = scenario.run(TypeResolver::new(), XgOptions::default(), None).unwrap();

        let player = &outcome.level.players[0];
        assert_eq!(player.cards, [true, false, false, false, false, true]);
        assert_eq!(outcome.level.xg.lines[0].as_ref().unwrap().info.act_count, 0);
        assert_eq!(outcome.game.commands, vec!["echo hello".to_string()]);
        assert_eq!(outcome.game.exit, Some(ExitTarget::Map("E1M2".to_string())));
        assert_eq!(outcome.level.level_time, 4);
        assert!(matches!(outcome.played[..], [Played::Sfx { sfx: 40, .. }]));
    }

    #[test]
    fn bad_scenarios() {
        assert!(Scenario::parse("tics = 1\nfoo = 2").is_err());

        let bad_flag = r#"
            [[sector]]
            floor = 0.0
            ceiling = 8.0
            [[thing]]
            kind = 1
            xy = [0.0, 0.0]
            flags = ["floating"]
        "#;
        let scenario = Scenario::parse(bad_flag).unwrap();
        assert!(scenario.run(TypeResolver::new(), XgOptions::default(), None).is_err());

        let bad_skill = Scenario::parse("skill = \"impossible\"").unwrap();
        assert!(bad_skill.run(TypeResolver::new(), XgOptions::default(), None).is_err());
    }
}
