use glam::Vec2;
use log::debug;
use math::Angle;
use xg_traits::GameTraits;

use crate::Level;
use crate::level::map_defs::LineDef;

/// How many one unit steps may be taken to get the exit point on to the
/// right side of the destination line
const FUDGEFACTOR: usize = 10;
const FUDGE_STEP: f32 = 1.0;

/// Where a thing crossing `origin` at `xy` comes out of `dest`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportExit {
    pub xy: Vec2,
    /// Side of `dest` the thing exits on
    pub side: usize,
    /// Turn to apply to the thing's angle and momentum
    pub turn: Angle,
}

/// Map a position on `origin` on to `dest`. The thing keeps its fractional
/// position along the line, measured from the end vertex of `dest` (or the
/// start vertex when `reversed`), and is turned by the difference in line
/// angles, plus a half turn when not reversed.
pub fn line_teleport_exit(origin: &LineDef, dest: &LineDef, xy: Vec2, reversed: bool) -> TeleportExit {
    let pos = if origin.delta.x.abs() > origin.delta.y.abs() {
        (xy.x - origin.v1.x) / origin.delta.x
    } else if origin.delta.y != 0.0 {
        (xy.y - origin.v1.y) / origin.delta.y
    } else {
        0.0
    };

    let mut turn = dest.angle() - origin.angle();
    let (mut exit, side) = if reversed {
        (dest.v2 - dest.delta * (1.0 - pos), 1)
    } else {
        turn += Angle::from_degrees(180.0);
        (dest.v2 - dest.delta * pos, 0)
    };

    // Right hand normal of the destination, pointing to its front
    let len = dest.length();
    if len > 0.0 {
        let mut normal = Vec2::new(dest.delta.y, -dest.delta.x) / len;
        if side == 1 {
            normal = -normal;
        }
        let mut fudge = FUDGEFACTOR;
        while dest.point_on_side(exit) != side && fudge > 0 {
            exit += normal * FUDGE_STEP;
            fudge -= 1;
        }
    }

    TeleportExit { xy: exit, side, turn }
}

/// Doom function name `P_TeleportMove`
///
/// Ask the game if the thing may occupy `xy`, then place it there, linked to
/// `sector`. Nothing changes if the game refuses.
pub fn teleport_move(
    level: &mut Level,
    game: &mut dyn GameTraits,
    mobj: usize,
    xy: Vec2,
    sector: usize,
    telefrag: bool,
) -> bool {
    let Some(floor) = level.map_data.sectors().get(sector).map(|s| s.floorheight) else {
        debug!("Teleport exit sector {sector} is missing");
        return false;
    };
    if !game.teleport_move(mobj, xy.x, xy.y, telefrag) {
        debug!("Teleport of thing {mobj} to {xy} blocked");
        return false;
    }

    level.relink_map_object(mobj, sector);
    if let Some(thing) = level.mobj_mut(Some(mobj)) {
        let height = thing.z - thing.floorz;
        thing.xy = xy;
        thing.floorz = floor;
        thing.z = floor + height;
    }
    true
}
