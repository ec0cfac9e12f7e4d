//! Map objects as the line engine sees them: something with a position, a
//! type, some health, and maybe a player driving it.

use glam::Vec2;
use math::Angle;

/// A subset of the classic `MF_` flags that lines care about
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapObjFlag {
    /// Call P_SpecialThing when touched.
    Special = 1,
    /// Blocks.
    Solid = 2,
    /// Can be hit.
    Shootable = 4,
    /// Don't use the sector links (invisible but touchable).
    Nosector = 8,
    /// Don't cross lines or look at heights on teleport.
    Teleport = 0x8000,
    /// Don't hit same species, explode on block. Player missiles as well as
    /// fireballs of various kinds.
    Missile = 0x10000,
    /// Don't stop moving halfway off a step, that is, have dead bodies slide
    /// down all the way.
    Corpse = 0x100000,
    /// On kill, count this enemy object towards intermission kill total.
    CountKill = 0x400000,
}

#[derive(Debug, Clone)]
pub struct MapObject {
    /// Thing type, as used by line types that check for things
    pub kind: i32,
    pub xy: Vec2,
    pub z: f32,
    /// Height of the floor under the thing
    pub floorz: f32,
    pub angle: Angle,
    pub momxy: Vec2,
    pub health: i32,
    pub flags: u32,
    /// Index in to `Level::players` if a player drives this thing
    pub player: Option<usize>,
    /// The sector this thing is linked in to
    pub sector: usize,
    /// Translation colour
    pub color: i32,
    /// Set once the thing is gone from the map. The slot is kept so indexes
    /// held elsewhere stay valid.
    pub removed: bool,
}

impl MapObject {
    pub fn new(kind: i32, xy: Vec2, z: f32, angle: Angle, flags: u32, health: i32, sector: usize) -> Self {
        Self {
            kind,
            xy,
            z,
            floorz: z,
            angle,
            momxy: Vec2::ZERO,
            health,
            flags,
            player: None,
            sector,
            color: 0,
            removed: false,
        }
    }

    pub fn has_flag(&self, flag: MapObjFlag) -> bool {
        self.flags & flag as u32 != 0
    }
}
