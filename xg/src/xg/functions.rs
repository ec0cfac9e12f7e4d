//! Class functions. `do_function` decides how a class is called, the `do_*`
//! functions run once on the origin line, the `trav_*` functions run for
//! each line or plane the class reference names.

use glam::Vec2;
use log::debug;
use math::Angle;
use xg_traits::{ExitTarget, GameTraits};

use crate::doom_def::{Card, DEFAULT_ARMOR_TYPE};
use crate::env::switch::start_sector_sound;
use crate::env::teleport::{line_teleport_exit, teleport_move};
use crate::level::map_defs::SideSection;
use crate::thing::MapObject;
use crate::xg::activate::line_event;
use crate::xg::class::ClassFunc;
use crate::xg::line_type::{EventKind, LineType};
use crate::xg::params::{ClassParams, FlashAt};
use crate::xg::traverse::{traverse_lines, traverse_planes, validate_line_ref};
use crate::xg::{set_line_type, xg_dev, LineCtx, XgCall};
use crate::Level;

/// Distance in front of the exit point the destination flash spawns
const TELEPORT_FLASH_DIST: f32 = 20.0;

/// Run the class function of `info` for the line, walking its reference if
/// the class has one.
pub fn do_function(
    level: &mut Level,
    game: &mut dyn GameTraits,
    info: &LineType,
    ctx: LineCtx,
    side: usize,
    activator: Option<usize>,
    ev: EventKind,
) {
    let class = info.class.info();
    if !class.accepts(ev) {
        xg_dev!(level, "Line {}: {} does not run for {ev:?}", ctx.line, class.name);
        return;
    }
    let call = XgCall {
        info,
        ctx,
        side,
        activator,
        ev,
    };
    if let Some(init) = class.init {
        init(level, &call);
    }

    let target = info.params.target().unwrap_or_default();
    match class.func {
        ClassFunc::Nothing => {}
        ClassFunc::Direct(func) => func(level, game, &call),
        ClassFunc::Lines(func) => {
            traverse_lines(level, ctx, target.kind, target.datum, |level, line| {
                func(level, game, &call, line)
            });
        }
        ClassFunc::Planes(func) | ClassFunc::Sectors(func) => {
            traverse_planes(level, ctx, target.kind, target.datum, |level, sector, ceiling| {
                func(level, game, &call, sector, ceiling)
            });
        }
    }
}

/// Reset the chain sequence cursor and time the first step
pub(crate) fn start_chain_sequence(level: &mut Level, ctx: LineCtx, info: &LineType) {
    let ClassParams::ChainSequence(p) = &info.params else {
        return;
    };
    let timer = level.random.percent_float(p.interval(1), p.randomness);
    if let Some(xg) = level.xg.get_mut(ctx) {
        xg.ch_idx = 1;
        xg.ch_timer = timer;
    }
}

pub fn init_chain_sequence(level: &mut Level, call: &XgCall) {
    start_chain_sequence(level, call.ctx, call.info);
}

pub fn do_damage(level: &mut Level, _game: &mut dyn GameTraits, call: &XgCall) {
    let ClassParams::Damage(p) = call.info.params else {
        return;
    };
    let Some(health) = level.mobj(call.activator).map(|m| m.health) else {
        xg_dev!(level, "Line {}: damage needs an activator", call.ctx.line);
        return;
    };
    if health <= p.lower_limit {
        return;
    }

    let delta = level.random.range(p.min, p.max);
    let Some(mobj) = level.mobj_mut(call.activator) else {
        return;
    };
    if delta > 0 {
        mobj.health -= delta;
    } else if delta < 0 && mobj.health < p.upper_limit {
        mobj.health = (mobj.health - delta).min(p.upper_limit);
    }
}

pub fn do_power(level: &mut Level, _game: &mut dyn GameTraits, call: &XgCall) {
    let ClassParams::Power(p) = call.info.params else {
        return;
    };
    let Some(pnum) = level.player_of(call.activator) else {
        xg_dev!(level, "Line {}: power needs a player", call.ctx.line);
        return;
    };

    let mut delta = level.random.range(p.min, p.max);
    let player = &mut level.players[pnum];
    if delta > 0 {
        if player.armorpoints + delta >= p.max_limit {
            delta = (p.max_limit - player.armorpoints).max(0);
        }
    } else if player.armorpoints + delta <= p.min_limit {
        delta = (p.min_limit - player.armorpoints).min(0);
    }

    if delta != 0 {
        if player.armortype == 0 {
            player.armortype = DEFAULT_ARMOR_TYPE;
        }
        player.armorpoints += delta;
    }
}

pub fn do_key(level: &mut Level, _game: &mut dyn GameTraits, call: &XgCall) {
    let ClassParams::Key(p) = call.info.params else {
        return;
    };
    let Some(pnum) = level.player_of(call.activator) else {
        xg_dev!(level, "Line {}: keys need a player", call.ctx.line);
        return;
    };

    let player = &mut level.players[pnum];
    for card in Card::ALL {
        let bit = 1 << card as u32;
        if p.give & bit != 0 {
            player.cards[card as usize] = true;
        }
        if p.take & bit != 0 {
            player.cards[card as usize] = false;
        }
    }
}

pub fn do_music(level: &mut Level, _game: &mut dyn GameTraits, call: &XgCall) {
    let ClassParams::Music(p) = call.info.params else {
        return;
    };
    let song = if p.data_ref != 0 {
        validate_line_ref(level, call.ctx, p.data_ref, "music")
    } else {
        p.song
    };
    level.start_music(song, p.looped);
}

pub fn do_leave_map(level: &mut Level, game: &mut dyn GameTraits, call: &XgCall) {
    let ClassParams::LeaveMap(p) = call.info.params else {
        return;
    };

    let target = if p.secret {
        ExitTarget::Map(game.named_exit_target("secret"))
    } else {
        let map = if p.data_ref != 0 {
            validate_line_ref(level, call.ctx, p.data_ref, "leave map")
        } else {
            p.map
        };
        if map <= 0 {
            ExitTarget::Next
        } else {
            let episode = game.episode();
            let id = game.compose_map_id(episode, map as usize);
            if game.map_exists(&id) {
                ExitTarget::Map(id)
            } else {
                debug!("Line {}: map {id} does not exist, going to the episode start", call.ctx.line);
                ExitTarget::Map(game.compose_map_id(episode, 1))
            }
        }
    };
    xg_dev!(level, "Line {}: leaving map for {target:?}", call.ctx.line);
    game.leave_map(target);
}

pub fn do_explode(level: &mut Level, game: &mut dyn GameTraits, call: &XgCall) {
    match call.activator.filter(|_| level.mobj(call.activator).is_some()) {
        Some(mobj) => game.explode_missile(mobj),
        None => xg_dev!(level, "Line {}: nothing to explode", call.ctx.line),
    }
}

pub fn do_command(level: &mut Level, game: &mut dyn GameTraits, call: &XgCall) {
    let ClassParams::Command(command) = &call.info.params else {
        return;
    };
    if command.is_empty() {
        xg_dev!(level, "Line {}: no command to run", call.ctx.line);
        return;
    }
    if !game.execute(command) {
        debug!("Line {}: command failed: {command}", call.ctx.line);
    }
}

pub fn trav_line_type_change(
    level: &mut Level,
    _game: &mut dyn GameTraits,
    call: &XgCall,
    target: Option<LineCtx>,
) -> bool {
    let ClassParams::LineTypeChange(p) = call.info.params else {
        return false;
    };
    if let Some(target) = target {
        set_line_type(level, target, p.new_type);
    }
    true
}

/// Send a function event to target lines that are not yet in the wanted state
fn smart_activate(
    level: &mut Level,
    game: &mut dyn GameTraits,
    call: &XgCall,
    target: Option<LineCtx>,
    active: bool,
) -> bool {
    let Some(target) = target else {
        return true;
    };
    if level.xg.get(target).is_some_and(|xg| xg.active != active) {
        line_event(level, game, EventKind::Func, 0, target, 0, call.activator);
    }
    true
}

pub fn trav_activate(level: &mut Level, game: &mut dyn GameTraits, call: &XgCall, target: Option<LineCtx>) -> bool {
    smart_activate(level, game, call, target, true)
}

pub fn trav_deactivate(level: &mut Level, game: &mut dyn GameTraits, call: &XgCall, target: Option<LineCtx>) -> bool {
    smart_activate(level, game, call, target, false)
}

pub fn trav_line_count(level: &mut Level, _game: &mut dyn GameTraits, call: &XgCall, target: Option<LineCtx>) -> bool {
    let ClassParams::LineCount(p) = call.info.params else {
        return false;
    };
    let Some(xg) = target.and_then(|t| level.xg.get_mut(t)) else {
        return true;
    };
    if p.set {
        xg.info.act_count = p.value;
    } else {
        xg.info.act_count += p.value;
    }
    true
}

/// Target's disabled flag follows the origin's active flag, or its inverse
fn follow_origin(level: &mut Level, call: &XgCall, target: Option<LineCtx>, invert: bool) -> bool {
    let Some(origin_active) = level.xg.get(call.ctx).map(|xg| xg.active) else {
        return false;
    };
    if let Some(xg) = target.and_then(|t| level.xg.get_mut(t)) {
        xg.disabled = origin_active != invert;
    }
    true
}

pub fn trav_disable_if_active(
    level: &mut Level,
    _game: &mut dyn GameTraits,
    call: &XgCall,
    target: Option<LineCtx>,
) -> bool {
    follow_origin(level, call, target, false)
}

pub fn trav_enable_if_active(
    level: &mut Level,
    _game: &mut dyn GameTraits,
    call: &XgCall,
    target: Option<LineCtx>,
) -> bool {
    follow_origin(level, call, target, true)
}

fn change_section(section: &mut SideSection, material: i32, color: &[i32]) {
    if material > 0 {
        section.material = Some(material as usize);
    }
    for (c, v) in section.color.iter_mut().zip(color) {
        if *v > 0 {
            *c = *v as f32 / 255.0;
        }
    }
}

pub fn trav_wall_material(
    level: &mut Level,
    _game: &mut dyn GameTraits,
    call: &XgCall,
    target: Option<LineCtx>,
) -> bool {
    let ClassParams::WallMaterial(p) = call.info.params else {
        return false;
    };
    let Some(target) = target else {
        return true;
    };
    let sidenum = level
        .map_data
        .linedefs()
        .get(target.line)
        .and_then(|l| l.sidedef(if p.side == 0 { 0 } else { 1 }));
    let Some(side) = sidenum.and_then(|s| level.map_data.sidedefs_mut().get_mut(s)) else {
        xg_dev!(level, "Line {}: no side {} to change", target.line, p.side);
        return true;
    };

    change_section(&mut side.top, p.top, &p.top_rgb);
    change_section(&mut side.middle, p.middle, &p.middle_rgba);
    change_section(&mut side.bottom, p.bottom, &p.bottom_rgb);
    if p.middle == 0 && p.clear_middle {
        side.middle.material = None;
    }
    if p.blend_mode != 0 {
        side.blend_mode = p.blend_mode;
    }
    side.flags |= p.side_flags;
    true
}

fn spawn_flash(level: &mut Level, kind: i32, sound: i32, xy: Vec2, angle: Angle, sector: usize) {
    let Some((z, sector_uid)) = level.map_data.sectors().get(sector).map(|s| (s.floorheight, s.sound_uid)) else {
        return;
    };
    let uid = if kind != 0 {
        level.spawn_map_object(MapObject::new(kind, xy, z, angle, 0, 0, sector))
    } else {
        sector_uid
    };
    level.start_sound(uid, sound, xy.x, xy.y);
}

/// Move the activator through to the target line. Only the first usable
/// destination is taken.
pub fn trav_line_teleport(
    level: &mut Level,
    game: &mut dyn GameTraits,
    call: &XgCall,
    target: Option<LineCtx>,
) -> bool {
    let ClassParams::LineTeleport(p) = call.info.params else {
        return false;
    };
    let Some(target) = target else {
        return true;
    };
    if target.line == call.ctx.line {
        return true;
    }
    let Some((mobj, old_xy, old_angle, old_sector)) = call
        .activator
        .and_then(|i| level.mobj(Some(i)).map(|m| (i, m.xy, m.angle, m.sector)))
    else {
        xg_dev!(level, "Line {}: nothing to teleport", call.ctx.line);
        return false;
    };

    let lines = level.map_data.linedefs();
    let (Some(origin), Some(dest)) = (lines.get(call.ctx.line), lines.get(target.line)) else {
        return false;
    };
    let exit = line_teleport_exit(origin, dest, old_xy, p.reversed);
    let Some(sector) = dest.sector(exit.side) else {
        xg_dev!(level, "Line {}: destination {} has no sector on side {}", call.ctx.line, target.line, exit.side);
        return true;
    };

    if !teleport_move(level, game, mobj, exit.xy, sector, p.telefrag) {
        return false;
    }
    let mut new_angle = old_angle;
    if let Some(thing) = level.mobj_mut(Some(mobj)) {
        thing.angle += exit.turn;
        thing.momxy = exit.turn.rotate(thing.momxy);
        new_angle = thing.angle;
    }

    if p.flash_at & FlashAt::Source as u32 != 0 {
        spawn_flash(level, p.flash_type, p.sound, old_xy, old_angle, old_sector);
    }
    if p.flash_at & FlashAt::Dest as u32 != 0 {
        let xy = exit.xy + new_angle.unit() * TELEPORT_FLASH_DIST;
        spawn_flash(level, p.flash_type, p.sound, xy, new_angle, sector);
    }
    false
}

pub fn trav_plane_material(
    level: &mut Level,
    _game: &mut dyn GameTraits,
    call: &XgCall,
    sector: Option<usize>,
    ceiling: bool,
) -> bool {
    let ClassParams::PlaneMaterial(p) = call.info.params else {
        return false;
    };
    if p.material <= 0 {
        return true;
    }
    if let Some(sector) = sector.and_then(|s| level.map_data.sectors_mut().get_mut(s)) {
        if ceiling {
            sector.ceilingpic = p.material as usize;
        } else {
            sector.floorpic = p.material as usize;
        }
    }
    true
}

pub fn trav_sector_sound(
    level: &mut Level,
    _game: &mut dyn GameTraits,
    call: &XgCall,
    sector: Option<usize>,
    _ceiling: bool,
) -> bool {
    let ClassParams::SectorSound(p) = call.info.params else {
        return false;
    };
    if let Some(sector) = sector {
        start_sector_sound(level, sector, p.sound);
    }
    true
}

pub fn trav_sector_light(
    level: &mut Level,
    _game: &mut dyn GameTraits,
    call: &XgCall,
    sector: Option<usize>,
    _ceiling: bool,
) -> bool {
    let ClassParams::SectorLight(p) = call.info.params else {
        return false;
    };
    if let Some(sector) = sector.and_then(|s| level.map_data.sectors_mut().get_mut(s)) {
        let light = if p.absolute {
            p.value
        } else {
            sector.lightlevel as i32 + p.value
        };
        sector.lightlevel = light.clamp(0, 255) as usize;
    }
    true
}
