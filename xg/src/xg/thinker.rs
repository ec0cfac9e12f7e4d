//! Per-tic work of every XG line: timers, ticker events, chain sequences,
//! counted reverts and material scrolling.

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::Vec2;
use math::{flt2tic, Angle, TICRATE};
use xg_traits::GameTraits;

use crate::level::map_defs::SectionKind;
use crate::xg::activate::{activate_line, do_chain, line_event};
use crate::xg::class::ClassId;
use crate::xg::functions::do_function;
use crate::xg::line_type::{EventKind, LineTypeFlags2};
use crate::xg::params::{ChainFlags, ClassParams};
use crate::xg::LineCtx;
use crate::Level;

/// Think every line with XG state, in line order
pub fn xl_ticker(level: &mut Level, game: &mut dyn GameTraits) {
    #[cfg(feature = "hprof")]
    profile!("xl_ticker");
    for line in 0..level.xg.lines.len() {
        think(level, game, LineCtx::line(line));
    }
}

fn think(level: &mut Level, game: &mut dyn GameTraits, ctx: LineCtx) {
    let level_time = level.level_time as i32;
    let Some(xg) = level.xg.get_mut(ctx) else {
        return;
    };
    if xg.disabled {
        return;
    }
    xg.timer += 1;
    xg.ticker_timer += 1;

    let info = &xg.info;
    let in_window = info.ticker_end <= 0.0
        || (level_time >= flt2tic(info.ticker_start) && level_time <= flt2tic(info.ticker_end));
    if in_window && xg.ticker_timer > flt2tic(info.ticker_interval) {
        xg.ticker_timer = 0;
        line_event(level, game, EventKind::Ticker, 0, ctx, 0, None);

        if let Some(xg) = level.xg.get(ctx) {
            let info = &xg.info;
            let forced = (info.has_flag2(LineTypeFlags2::WhenActive) && xg.active)
                || (info.has_flag2(LineTypeFlags2::WhenInactive) && !xg.active);
            if forced && (!info.has_flag2(LineTypeFlags2::WhenLast) || info.act_count == 1) {
                let info = info.clone();
                let activator = xg.activator;
                do_function(level, game, &info, ctx, 0, activator, EventKind::Forced);
            }
        }
    }

    let Some(xg) = level.xg.get_mut(ctx) else {
        return;
    };
    if xg.active && xg.info.class == ClassId::ChainSequence {
        xg.ch_timer -= 1.0 / TICRATE as f32;
        if xg.ch_timer < 0.0 {
            chain_step(level, game, ctx);
        }
    }

    let Some(xg) = level.xg.get(ctx) else {
        return;
    };
    let info = &xg.info;
    if info.act_time >= 0.0 && xg.timer > flt2tic(info.act_time) {
        let revert = if xg.active && info.act_type.reverts_active() {
            Some(false)
        } else if !xg.active && info.act_type.reverts_inactive() {
            Some(true)
        } else {
            None
        };
        if let Some(going_active) = revert {
            let info = info.clone();
            let activator = xg.activator;
            activate_line(level, game, going_active, &info, ctx, 0, activator, EventKind::Auto);
        }
    }

    if let Some(xg) = level.xg.get(ctx) {
        let speed = xg.info.material_move_speed;
        if speed != 0.0 {
            let step = Angle::from_degrees(xg.info.material_move_angle).unit() * speed;
            scroll_materials(level, ctx.line, step);
        }
    }
}

/// Fire the current chain sequence step, or finish the sequence
fn chain_step(level: &mut Level, game: &mut dyn GameTraits, ctx: LineCtx) {
    let Some(xg) = level.xg.get(ctx) else {
        return;
    };
    let ClassParams::ChainSequence(p) = &xg.info.params else {
        return;
    };
    let p = p.clone();
    let idx = xg.ch_idx;
    let activator = xg.activator;

    if let Some(step) = p.step(idx) {
        do_chain(level, game, ctx, step.line_type, true, 0, activator);

        let mut next = idx + 1;
        if p.step(next).is_none() && p.has_flag(ChainFlags::Loop) {
            next = 1;
        }
        let timer = level.random.percent_float(p.interval(next), p.randomness);
        if let Some(xg) = level.xg.get_mut(ctx) {
            xg.ch_idx = next;
            xg.ch_timer = timer;
        }
    } else if p.has_flag(ChainFlags::DeactivateWhenDone) {
        let info = xg.info.clone();
        activate_line(level, game, false, &info, ctx, 0, activator, EventKind::Chain);
    }
}

fn scroll_materials(level: &mut Level, line: usize, step: Vec2) {
    let Some(def) = level.map_data.linedefs().get(line) else {
        return;
    };
    let sides = [Some(def.front_sidedef), def.back_sidedef];
    for side in sides.into_iter().flatten() {
        if let Some(side) = level.map_data.sidedefs_mut().get_mut(side) {
            for kind in SectionKind::ALL {
                side.section_mut(kind).offset += step;
            }
        }
    }
}

