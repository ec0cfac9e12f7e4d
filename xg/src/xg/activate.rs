//! Events arriving at lines: whether they are accepted, and what changes when
//! a line flips between active and inactive.

use log::warn;
use xg_traits::{GameTraits, Skill};

use crate::doom_def::{Card, MAXPLAYERS, SFX_OOF};
use crate::env::switch::{change_switch_texture, start_sector_sound};
use crate::lang::english;
use crate::level::flags::LineDefFlags;
use crate::level::map_defs::SectionKind;
use crate::thing::MapObjFlag;
use crate::xg::functions::do_function;
use crate::xg::line_type::{ActType, ActorClass, EventKind, LineType, LineTypeFlags2, SKILL_MASK};
use crate::xg::traverse::{collect_lines, LineRef};
use crate::xg::{set_line_type, xg_dev, LineCtx, XgLine};
use crate::Level;

/// How the trigger grid sees the activator
pub fn actor_class(level: &Level, activator: Option<usize>) -> ActorClass {
    match level.mobj(activator) {
        Some(m) if m.player.is_some() => ActorClass::Player,
        Some(m) if m.has_flag(MapObjFlag::Missile) => ActorClass::Missile,
        Some(m) if m.has_flag(MapObjFlag::CountKill) => ActorClass::Monster,
        _ => ActorClass::Other,
    }
}

/// A player or monster used the line
pub fn use_line(level: &mut Level, game: &mut dyn GameTraits, line: usize, side: usize, thing: usize) -> bool {
    line_event(level, game, EventKind::Use, 0, LineCtx::line(line), side, Some(thing))
}

/// A thing walked over the line
pub fn cross_line(level: &mut Level, game: &mut dyn GameTraits, line: usize, side: usize, thing: usize) -> bool {
    line_event(level, game, EventKind::Cross, 0, LineCtx::line(line), side, Some(thing))
}

/// A hitscan attack hit the line
pub fn shoot_line(level: &mut Level, game: &mut dyn GameTraits, line: usize, side: usize, thing: usize) -> bool {
    line_event(level, game, EventKind::Shoot, 0, LineCtx::line(line), side, Some(thing))
}

/// A thing ran in to the line
pub fn hit_line(level: &mut Level, game: &mut dyn GameTraits, line: usize, side: usize, thing: usize) -> bool {
    line_event(level, game, EventKind::Hit, 0, LineCtx::line(line), side, Some(thing))
}

/// Deliver an event to a line. With a non-zero `chain_type` the rules of that
/// type are used instead of the line's own. Returns true if the event was
/// accepted and the line changed state.
pub fn line_event(
    level: &mut Level,
    game: &mut dyn GameTraits,
    ev: EventKind,
    chain_type: i32,
    ctx: LineCtx,
    side: usize,
    activator: Option<usize>,
) -> bool {
    if level.xg.depth >= level.xg.options.max_chain_depth {
        warn!(
            "Line {}: events nested deeper than {}, dropped {ev:?} with chain type {chain_type}",
            ctx.line, level.xg.options.max_chain_depth
        );
        return false;
    }
    level.xg.depth += 1;
    let accepted = handle_event(level, game, ev, chain_type, ctx, side, activator);
    level.xg.depth -= 1;
    accepted
}

fn handle_event(
    level: &mut Level,
    game: &mut dyn GameTraits,
    ev: EventKind,
    chain_type: i32,
    ctx: LineCtx,
    side: usize,
    activator: Option<usize>,
) -> bool {
    let Some(xg) = level.xg.get(ctx) else {
        return false;
    };
    if xg.disabled {
        xg_dev!(level, "Line {}: disabled, {ev:?} ignored", ctx.line);
        return false;
    }
    let active = xg.active;

    let mut info = if chain_type != 0 {
        match level.xg.resolver.resolve(chain_type) {
            Ok(info) => info,
            Err(e) => {
                xg_dev!(level, "Line {}: chain {chain_type}: {e}", ctx.line);
                return false;
            }
        }
    } else {
        xg.info.clone()
    };

    if info.ev_chain != 0 && line_event(level, game, ev, info.ev_chain, ctx, side, activator) {
        xg_dev!(level, "Line {}: {ev:?} taken by event chain {}", ctx.line, info.ev_chain);
        return true;
    }

    match info.act_type {
        ActType::CountedOff if active => {
            xg_dev!(level, "Line {}: already active", ctx.line);
            return false;
        }
        ActType::CountedOn if !active => {
            xg_dev!(level, "Line {}: already inactive", ctx.line);
            return false;
        }
        _ => {}
    }

    let triggered = match ev {
        EventKind::Chain | EventKind::Func | EventKind::Forced | EventKind::Auto => true,
        EventKind::Use | EventKind::Cross | EventKind::Shoot | EventKind::Hit => {
            info.triggered_by(ev, actor_class(level, activator), active)
                || level.xg.options.any_trigger
                || info.has_flag2(LineTypeFlags2::AnyTrigger)
        }
        EventKind::Ticker => {
            (active && info.has_flag2(LineTypeFlags2::TickerD))
                || (!active && info.has_flag2(LineTypeFlags2::TickerA))
        }
    };
    if !triggered {
        xg_dev!(level, "Line {}: {ev:?} does not trigger type {}", ctx.line, info.id);
        return false;
    }

    if !gates_pass(level, game, &info, ctx, side, activator, ev) {
        return false;
    }

    if info.act_count > 0 && !matches!(ev, EventKind::Chain | EventKind::Func) {
        info.act_count -= 1;
        if chain_type == 0 {
            if let Some(xg) = level.xg.get_mut(ctx) {
                xg.info.act_count = info.act_count;
            }
        }
    }
    activate_line(level, game, !active, &info, ctx, side, activator, ev);
    true
}

/// Every line the gate reference names must have XG state in this state
fn lines_in_state(level: &Level, ctx: LineCtx, (kind, datum): (i32, i32), active: bool) -> bool {
    collect_lines(level, ctx, kind, datum).into_iter().all(|target| match target {
        Some(target) => level.xg.get(target).is_some_and(|xg| xg.active == active),
        None => true,
    })
}

fn skill_bit(skill: Skill) -> u32 {
    match skill {
        Skill::NoItems | Skill::Baby => 1,
        Skill::Easy => 1 << 1,
        Skill::Medium => 1 << 2,
        Skill::Hard => 1 << 3,
        Skill::Nightmare => 1 << 4,
    }
}

fn gates_pass(
    level: &mut Level,
    game: &mut dyn GameTraits,
    info: &LineType,
    ctx: LineCtx,
    side: usize,
    activator: Option<usize>,
    ev: EventKind,
) -> bool {
    let line_flags = level.map_data.linedefs().get(ctx.line).map(|l| l.flags).unwrap_or(0);
    let pnum = level.player_of(activator);
    let gates = &info.gates;

    macro_rules! reject {
        ($($arg:tt)+) => {{
            xg_dev!(level, "Line {}: {}", ctx.line, format_args!($($arg)+));
            return false;
        }};
    }

    if info.has_flag2(LineTypeFlags2::NoOtherUseSecret)
        && ev == EventKind::Use
        && pnum.is_none()
        && line_flags & LineDefFlags::Secret as u32 != 0
    {
        reject!("only players may use this secret line");
    }
    if info.has_flag2(LineTypeFlags2::MobjGone) {
        let left = level
            .things
            .iter()
            .filter(|t| !t.removed && t.kind == gates.thing_type)
            .count();
        if left > 0 {
            reject!("{left} things of type {} remain", gates.thing_type);
        }
    }
    if info.has_flag2(LineTypeFlags2::ActivatorType)
        && level.mobj(activator).map(|m| m.kind) != Some(gates.thing_type)
    {
        reject!("activator is not of type {}", gates.thing_type);
    }
    if side != 0 && !info.has_flag2(LineTypeFlags2::TwoSided) {
        reject!("only the front side may activate");
    }
    if info.act_count == 0 {
        reject!("no activations left");
    }

    let health = level.mobj(activator).map(|m| m.health).unwrap_or(0);
    if info.has_flag2(LineTypeFlags2::HealthAbove) && health <= gates.health_above {
        reject!("health {health} not above {}", gates.health_above);
    }
    if info.has_flag2(LineTypeFlags2::HealthBelow) && health >= gates.health_below {
        reject!("health {health} not below {}", gates.health_below);
    }
    let armor = pnum.map(|p| level.players[p].armorpoints);
    if info.has_flag2(LineTypeFlags2::PowerAbove) && !armor.is_some_and(|a| a > gates.power_above) {
        reject!("armor not above {}", gates.power_above);
    }
    if info.has_flag2(LineTypeFlags2::PowerBelow) && !armor.is_some_and(|a| a < gates.power_below) {
        reject!("armor not below {}", gates.power_below);
    }

    if info.has_flag2(LineTypeFlags2::LineActive) && !lines_in_state(level, ctx, gates.line_active, true) {
        reject!("referenced lines are not all active");
    }
    if info.has_flag2(LineTypeFlags2::LineInactive) && !lines_in_state(level, ctx, gates.line_inactive, false) {
        reject!("referenced lines are not all inactive");
    }

    let sp = info.has_flag2(LineTypeFlags2::SinglePlayer);
    let coop = info.has_flag2(LineTypeFlags2::Cooperative);
    let dm = info.has_flag2(LineTypeFlags2::Deathmatch);
    if sp || coop || dm {
        let net = game.netgame();
        let rule = game.deathmatch();
        let allowed = (sp && !net) || (coop && net && rule == 0) || (dm && net && rule > 0);
        if !allowed {
            reject!("not for this game mode");
        }
    }

    if info.flags3 & SKILL_MASK != 0 && info.flags3 & skill_bit(game.skill()) == 0 {
        reject!("not for skill {:?}", game.skill());
    }

    if info.has_flag2(LineTypeFlags2::Color) && level.mobj(activator).map(|m| m.color) != Some(gates.color) {
        reject!("activator is not colour {}", gates.color);
    }

    let keys = info.keys();
    if keys != 0 {
        let Some(pnum) = pnum else {
            reject!("keys needed but the activator is not a player");
        };
        for card in Card::ALL {
            if keys & (1 << card as u32) != 0 && !level.players[pnum].has_card(card) {
                level.player_message(pnum, english::key_needed(card));
                if let (Some(uid), Some(mobj)) = (activator, level.mobj(activator)) {
                    level.start_sound(uid, SFX_OOF, mobj.xy.x, mobj.xy.y);
                }
                reject!("player {pnum} is missing {card:?}");
            }
        }
    }
    true
}

/// Fire `chain` at the line as a chain event, through a scratch copy of the
/// line's state that is thrown away afterwards.
pub(crate) fn do_chain(
    level: &mut Level,
    game: &mut dyn GameTraits,
    ctx: LineCtx,
    chain: i32,
    activating: bool,
    side: usize,
    activator: Option<usize>,
) -> bool {
    let info = match level.xg.resolver.resolve(chain) {
        Ok(info) => info,
        Err(e) => {
            xg_dev!(level, "Line {}: chain {chain}: {e}", ctx.line);
            return false;
        }
    };
    let mut scratch = XgLine::new(info);
    scratch.active = !activating;
    scratch.activator = activator;

    let idx = level.xg.scratch.len();
    level.xg.scratch.push(scratch);
    let scratch_ctx = LineCtx {
        line: ctx.line,
        scratch: Some(idx),
    };
    let accepted = line_event(level, game, EventKind::Chain, chain, scratch_ctx, side, activator);
    level.xg.scratch.truncate(idx);
    accepted
}

/// Put the line in to the given state and do everything `info` says goes
/// with that: chains, switch graphics, tagged lines, the function, message,
/// sound, wall material and follow up type.
#[allow(clippy::too_many_arguments)]
pub fn activate_line(
    level: &mut Level,
    game: &mut dyn GameTraits,
    going_active: bool,
    info: &LineType,
    ctx: LineCtx,
    side: usize,
    activator: Option<usize>,
    ev: EventKind,
) {
    let Some(xg) = level.xg.get_mut(ctx) else {
        return;
    };
    xg.activator = activator;

    let chain = if going_active { info.act_chain } else { info.deact_chain };
    if chain != 0 {
        do_chain(level, game, ctx, chain, going_active, side, activator);
    }

    let Some(xg) = level.xg.get_mut(ctx) else {
        return;
    };
    let changed = xg.active != going_active;
    xg.active = going_active;
    xg.timer = 0;
    if changed && ctx.scratch.is_none() {
        change_switch_texture(level, ctx.line);
    }

    let group = if going_active {
        LineTypeFlags2::GroupAct
    } else {
        LineTypeFlags2::GroupDeact
    };
    if info.has_flag2(group) {
        for target in collect_lines(level, ctx, LineRef::LineTagged as i32, 1).into_iter().flatten() {
            if let Some(xg) = level.xg.get_mut(target) {
                xg.active = going_active;
                xg.timer = 0;
            }
        }
    }

    if info.has_flag2(LineTypeFlags2::Multiple) {
        for target in collect_lines(level, ctx, LineRef::LineTagged as i32, 1).into_iter().flatten() {
            if level.xg.get(target).is_some_and(|xg| xg.active != going_active) {
                line_event(level, game, EventKind::Chain, 0, target, 0, activator);
            }
        }
    }

    let when = if going_active {
        LineTypeFlags2::WhenActivated
    } else {
        LineTypeFlags2::WhenDeactivated
    };
    if info.has_flag2(when) {
        if !info.has_flag2(LineTypeFlags2::WhenLast) || info.act_count == 1 {
            do_function(level, game, info, ctx, side, activator, ev);
        } else {
            xg_dev!(level, "Line {}: not the last activation, no function", ctx.line);
        }
    }

    let (msg, global, sound, material, line_type) = if going_active {
        (
            &info.act_msg,
            LineTypeFlags2::GlobalA,
            info.act_sound,
            info.act_material,
            info.act_line_type,
        )
    } else {
        (
            &info.deact_msg,
            LineTypeFlags2::GlobalD,
            info.deact_sound,
            info.deact_material,
            info.deact_line_type,
        )
    };

    if !msg.is_empty() {
        if info.has_flag2(global) {
            for pnum in 0..MAXPLAYERS {
                if level.player_in_game[pnum] {
                    level.player_message(pnum, msg);
                }
            }
        } else if let Some(pnum) = level.player_of(activator) {
            level.player_message(pnum, msg);
        }
    }

    let front = level.map_data.linedefs().get(ctx.line).map(|l| (l.frontsector, l.front_sidedef));
    if sound > 0 {
        if let Some((sector, _)) = front {
            start_sector_sound(level, sector, sound);
        }
    }
    if material > 0 {
        match (SectionKind::from_i32(info.wall_section), front) {
            (Some(kind), Some((_, side))) => {
                if let Some(side) = level.map_data.sidedefs_mut().get_mut(side) {
                    side.section_mut(kind).material = Some(material as usize);
                }
            }
            _ => xg_dev!(level, "Line {}: no wall section {} for material", ctx.line, info.wall_section),
        }
    }

    if line_type != 0 {
        set_line_type(level, ctx, line_type);
    }
}
