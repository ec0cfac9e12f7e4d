//! The data that makes up an entire level, along with functions to record state,
//! or get ref/mutable-ref to parts of it.

pub mod flags;
pub mod map_data;
pub mod map_defs;

use log::{debug, warn};
use math::Random;
use sound_nosnd::SndServerTx;
use sound_traits::SoundAction;
use xg_traits::GameTraits;

use crate::{
    doom_def::MAXPLAYERS,
    level::map_data::MapData,
    player::Player,
    thing::MapObject,
    xg::{resolver::TypeResolver, thinker::xl_ticker, XgState},
    XgOptions,
};

/// The level is considered a `World` or sorts. One that exists only
/// while the player is in it. Every XG line state lives here too, so it is
/// all dropped together when the level ends.
pub struct Level {
    pub map_data: MapData,
    /// Things are never removed from this array, only marked, so indexes held
    /// by players, sectors and line activators stay valid
    pub things: Vec<MapObject>,
    /// Tracks which players are currently active
    pub player_in_game: [bool; MAXPLAYERS],
    pub players: [Player; MAXPLAYERS],
    pub level_time: u32,
    /// List of switch textures in ordered pairs
    pub switch_list: Vec<usize>,
    /// Provides ability for lines and sectors to start a sound
    pub(crate) snd_command: SndServerTx,
    pub random: Random,
    pub xg: XgState,
}

impl Level {
    /// Set up the level around already loaded map data. Line types are not
    /// assigned until `xg::init()` is called.
    pub fn new(
        map_data: MapData,
        switch_list: Vec<usize>,
        snd_command: SndServerTx,
        resolver: TypeResolver,
        options: XgOptions,
    ) -> Self {
        let line_count = map_data.linedefs().len();
        Level {
            map_data,
            things: Vec::new(),
            player_in_game: [false; MAXPLAYERS],
            players: Default::default(),
            level_time: 0,
            switch_list,
            snd_command,
            random: Random::new(),
            xg: XgState::new(line_count, resolver, options),
        }
    }

    /// Add a thing and link it in to its sector. Returns the thing index.
    pub fn spawn_map_object(&mut self, mobj: MapObject) -> usize {
        let idx = self.things.len();
        let sector = mobj.sector;
        self.things.push(mobj);
        match self.map_data.sectors_mut().get_mut(sector) {
            Some(sector) => sector.thinglist.push(idx),
            None => warn!("Thing {idx} spawned in missing sector {sector}"),
        }
        idx
    }

    /// Mark the thing as gone and unlink it from its sector
    pub fn remove_map_object(&mut self, idx: usize) {
        let Some(thing) = self.things.get_mut(idx) else {
            return;
        };
        thing.removed = true;
        let sector = thing.sector;
        if let Some(sector) = self.map_data.sectors_mut().get_mut(sector) {
            sector.thinglist.retain(|t| *t != idx);
        }
    }

    /// Move a thing from one sector's thing list to another
    pub fn relink_map_object(&mut self, idx: usize, sector: usize) {
        let Some(thing) = self.things.get_mut(idx) else {
            return;
        };
        let old = thing.sector;
        thing.sector = sector;
        if let Some(old) = self.map_data.sectors_mut().get_mut(old) {
            old.thinglist.retain(|t| *t != idx);
        }
        if let Some(new) = self.map_data.sectors_mut().get_mut(sector) {
            new.thinglist.push(idx);
        }
    }

    /// Attach player `pnum` to the thing at `mobj` and mark them in game
    pub fn set_player(&mut self, pnum: usize, mobj: usize) {
        if pnum >= MAXPLAYERS || mobj >= self.things.len() {
            warn!("Can't attach player {pnum} to thing {mobj}");
            return;
        }
        self.things[mobj].player = Some(pnum);
        self.players[pnum].mobj = Some(mobj);
        self.player_in_game[pnum] = true;
    }

    /// A thing that is still in the map
    pub fn mobj(&self, idx: Option<usize>) -> Option<&MapObject> {
        idx.and_then(|i| self.things.get(i)).filter(|m| !m.removed)
    }

    pub fn mobj_mut(&mut self, idx: Option<usize>) -> Option<&mut MapObject> {
        idx.and_then(|i| self.things.get_mut(i)).filter(|m| !m.removed)
    }

    /// The player number driving this thing, if any
    pub fn player_of(&self, idx: Option<usize>) -> Option<usize> {
        self.mobj(idx).and_then(|m| m.player).filter(|p| *p < MAXPLAYERS)
    }

    pub fn player_message(&mut self, pnum: usize, msg: &str) {
        if let Some(player) = self.players.get_mut(pnum) {
            debug!("Player {pnum}: {msg}");
            player.message = Some(msg.to_owned());
        }
    }

    /// Send a sound to the sound server, if there is an id to play
    pub fn start_sound(&self, uid: usize, sfx: i32, x: f32, y: f32) {
        if sfx <= 0 {
            return;
        }
        if let Err(e) = self.snd_command.send(SoundAction::StartSfx { uid, sfx, x, y }) {
            warn!("Sound server is gone: {e}");
        }
    }

    pub fn start_music(&self, music: i32, looping: bool) {
        if let Err(e) = self.snd_command.send(SoundAction::StartMusic(music, looping)) {
            warn!("Sound server is gone: {e}");
        }
    }

    /// Run one game tic of the level
    pub fn tic(&mut self, game: &mut dyn GameTraits) {
        xl_ticker(self, game);
        self.level_time += 1;
    }
}
