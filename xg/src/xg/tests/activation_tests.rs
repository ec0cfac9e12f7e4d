use glam::Vec2;
use sound_traits::SoundAction;

use super::fixture::*;
use crate::doom_def::SFX_OOF;
use crate::lang::english;
use crate::level::flags::LineDefFlags;
use crate::level::map_data::SECTOR_SOUND_UID;
use crate::thing::MapObjFlag;
use crate::xg::activate::actor_class;
use crate::xg::class::ClassId;
use crate::xg::line_type::{
    trigger_flag, ActType, ActorClass, EventKind, LineTypeFlags2, LineTypeFlags3,
};
use xg_traits::Skill;

#[test]
fn key_line_gives_only_its_key() {
    let mut key = line_type(100, ClassId::Key);
    key.iparm[0] = 1 << 2;
    let mut fix = Fixture::new(&[(100, 0)], vec![key]);

    assert!(fix.use_line(0));
    assert_eq!(fix.level.players[0].cards, [false, false, true, false, false, false]);
    assert!(fix.xg(0).active);
}

#[test]
fn counted_off_activates_once() {
    let mut t = command_type(101, "counted");
    t.act_type = ActType::CountedOff as u8;
    t.act_count = 1;
    let mut fix = Fixture::new(&[(101, 0)], vec![t]);

    assert!(fix.use_line(0));
    assert!(fix.xg(0).active);
    assert_eq!(fix.xg(0).info.act_count, 0);
    assert_eq!(fix.game.commands.len(), 1);

    assert!(!fix.use_line(0));
    assert!(fix.xg(0).active);
    assert_eq!(fix.game.commands.len(), 1);
}

#[test]
fn count_limits_accepted_events() {
    for count in 1..=4 {
        let mut t = command_type(102, "count");
        t.act_count = count;
        let mut fix = Fixture::new(&[(102, 0)], vec![t]);

        let accepted = (0..count + 3).filter(|_| fix.use_line(0)).count();
        assert_eq!(accepted, count as usize);
        assert_eq!(fix.xg(0).info.act_count, 0);
        // Frozen in whatever state the last accepted event left it
        assert_eq!(fix.xg(0).active, count % 2 == 1);
    }
}

#[test]
fn toggles_once_per_event() {
    let mut t = command_type(103, "toggle");
    t.flags2 |= LineTypeFlags2::Active as u32 | LineTypeFlags2::WhenDeactivated as u32;
    let mut fix = Fixture::new(&[(103, 0)], vec![t]);
    assert!(fix.xg(0).active);

    assert!(fix.use_line(0));
    assert!(!fix.xg(0).active);
    assert_eq!(fix.game.commands.len(), 1);

    assert!(fix.use_line(0));
    assert!(fix.xg(0).active);
    assert_eq!(fix.game.commands.len(), 2);
}

#[test]
fn event_chain_takes_precedence() {
    // The outer type would reject on its own triggers and gates
    let mut outer = command_type(200, "outer");
    outer.flags = 0;
    outer.flags2 |= LineTypeFlags2::HealthAbove as u32;
    outer.aparm[0] = 1000;
    outer.ev_chain = 201;
    outer.act_count = 3;
    let mut inner = line_type(201, ClassId::Key);
    inner.iparm[0] = 1;
    let mut fix = Fixture::new(&[(200, 0)], vec![outer, inner]);

    assert!(fix.use_line(0));
    assert!(fix.level.players[0].cards[0]);
    assert_eq!(fix.xg(0).info.id, 200);
    assert_eq!(fix.xg(0).info.act_count, 3);
    assert!(fix.game.commands.is_empty());
}

#[test]
fn rejected_chain_falls_through() {
    let mut outer = command_type(200, "outer");
    outer.ev_chain = 201;
    let mut inner = line_type(201, ClassId::Key);
    inner.flags = 0;
    inner.iparm[0] = 1;
    let mut fix = Fixture::new(&[(200, 0)], vec![outer, inner]);

    assert!(fix.use_line(0));
    assert!(!fix.level.players[0].cards[0]);
    assert_eq!(fix.game.commands, vec!["outer".to_string()]);
}

#[test]
fn self_chaining_type_is_bounded() {
    let mut t = command_type(300, "loop");
    t.ev_chain = 300;
    let mut fix = Fixture::new(&[(300, 0)], vec![t]);

    assert!(fix.use_line(0));
    assert!(fix.xg(0).active);
    assert_eq!(fix.game.commands.len(), 1);
    assert_eq!(fix.level.xg.depth, 0);

    fix.level.xg.options.max_chain_depth = 4;
    assert!(fix.use_line(0));
    assert!(!fix.xg(0).active);
    assert_eq!(fix.level.xg.depth, 0);
}

#[test]
fn disabled_lines_ignore_events() {
    let mut fix = Fixture::new(&[(103, 0)], vec![command_type(103, "x")]);
    fix.xg_mut(0).disabled = true;
    assert!(!fix.use_line(0));
    assert!(!fix.xg(0).active);
    assert!(fix.game.commands.is_empty());
}

#[test]
fn unresolved_lines_have_no_state() {
    let mut fix = Fixture::new(&[(999, 0), (0, 0)], vec![]);
    assert!(fix.level.xg.lines.iter().all(|l| l.is_none()));
    assert!(!fix.use_line(0));
    assert!(!fix.use_line(1));
}

#[test]
fn missing_key_message_and_sound() {
    let mut t = command_type(110, "door");
    t.flags3 = LineTypeFlags3::Key1 as u32 | LineTypeFlags3::Key3 as u32;
    let mut fix = Fixture::new(&[(110, 0)], vec![t]);

    assert!(!fix.use_line(0));
    assert_eq!(fix.level.players[0].message.as_deref(), Some(english::PD_BLUEO));
    let sounds = fix.sounds();
    assert_eq!(sounds.len(), 1);
    assert!(matches!(sounds[0], SoundAction::StartSfx { sfx: SFX_OOF, .. }));

    fix.level.players[0].cards[0] = true;
    assert!(!fix.use_line(0));
    assert_eq!(fix.level.players[0].message.as_deref(), Some(english::PD_REDO));

    fix.level.players[0].cards[2] = true;
    assert!(fix.use_line(0));
    assert_eq!(fix.game.commands.len(), 1);
}

#[test]
fn side_gate() {
    let t = command_type(120, "x");
    let mut two = command_type(121, "x");
    two.flags2 |= LineTypeFlags2::TwoSided as u32;
    let mut fix = Fixture::new(&[(120, 0), (121, 0)], vec![t, two]);
    let player = fix.player;

    assert!(!fix.use_by(0, 1, player));
    assert!(fix.use_by(1, 1, player));
}

#[test]
fn health_and_armor_gates() {
    let mut health = command_type(130, "x");
    health.flags2 |= LineTypeFlags2::HealthAbove as u32;
    health.aparm[0] = 100;
    let mut armor = command_type(131, "x");
    armor.flags2 |= LineTypeFlags2::PowerAbove as u32;
    armor.aparm[2] = 10;
    let mut fix = Fixture::new(&[(130, 0), (131, 0)], vec![health, armor]);

    assert!(!fix.use_line(0));
    fix.level.things[fix.player].health = 101;
    assert!(fix.use_line(0));

    assert!(!fix.use_line(1));
    fix.level.players[0].armorpoints = 20;
    assert!(fix.use_line(1));
}

#[test]
fn skill_and_network_gates() {
    let mut skill = command_type(140, "x");
    skill.flags3 = LineTypeFlags3::Skill4 as u32;
    let mut dm = command_type(141, "x");
    dm.flags2 |= LineTypeFlags2::Deathmatch as u32;
    let mut sp = command_type(142, "x");
    sp.flags2 |= LineTypeFlags2::SinglePlayer as u32 | LineTypeFlags2::Cooperative as u32;
    let mut fix = Fixture::new(&[(140, 0), (141, 0), (142, 0)], vec![skill, dm, sp]);

    assert!(!fix.use_line(0));
    fix.game.skill = Skill::Hard;
    assert!(fix.use_line(0));

    assert!(!fix.use_line(1));
    assert!(fix.use_line(2));
    fix.game.netgame = true;
    assert!(!fix.use_line(1));
    assert!(fix.use_line(2));
    fix.game.deathmatch = 1;
    assert!(fix.use_line(1));
    assert!(!fix.use_line(2));
}

#[test]
fn thing_gates() {
    let mut gone = command_type(150, "x");
    gone.flags2 |= LineTypeFlags2::MobjGone as u32;
    gone.aparm[9] = IMP_KIND;
    let mut kind = command_type(151, "x");
    kind.flags2 |= LineTypeFlags2::ActivatorType as u32 | LineTypeFlags2::AnyTrigger as u32;
    kind.aparm[9] = IMP_KIND;
    let mut fix = Fixture::new(&[(150, 0), (151, 0)], vec![gone, kind]);
    let imp = fix.spawn(IMP_KIND, Vec2::new(40.0, 40.0), MapObjFlag::CountKill as u32, 0);

    assert!(!fix.use_line(0));
    assert!(fix.use_by(1, 0, imp));
    assert!(!fix.use_line(1));

    fix.level.remove_map_object(imp);
    assert!(fix.use_line(0));
}

#[test]
fn colour_gate() {
    let mut t = command_type(152, "x");
    t.flags2 |= LineTypeFlags2::Color as u32;
    t.aparm[8] = 2;
    let mut fix = Fixture::new(&[(152, 0)], vec![t]);

    assert!(!fix.use_line(0));
    fix.level.things[fix.player].color = 2;
    assert!(fix.use_line(0));
}

#[test]
fn secret_lines_are_for_players() {
    let mut t = command_type(160, "x");
    t.flags2 |= LineTypeFlags2::NoOtherUseSecret as u32 | LineTypeFlags2::AnyTrigger as u32;
    let mut fix = Fixture::new(&[(160, 0)], vec![t]);
    fix.level.map_data.linedefs_mut()[0].flags |= LineDefFlags::Secret as u32;
    let imp = fix.spawn(IMP_KIND, Vec2::new(40.0, 40.0), MapObjFlag::CountKill as u32, 0);

    assert!(!fix.use_by(0, 0, imp));
    assert!(fix.use_line(0));
}

#[test]
fn line_state_gate() {
    let mut t = command_type(170, "x");
    t.flags2 |= LineTypeFlags2::LineActive as u32;
    // Index reference to line 1
    t.aparm[4] = 5;
    t.aparm[5] = 1;
    let plain = line_type(171, ClassId::None);
    let mut fix = Fixture::new(&[(170, 0), (171, 0)], vec![t, plain]);

    assert!(!fix.use_line(0));
    fix.xg_mut(1).active = true;
    assert!(fix.use_line(0));
}

#[test]
fn trigger_grid_by_actor() {
    let mut t = command_type(180, "x");
    t.flags = trigger_flag(EventKind::Use, ActorClass::Monster, false);
    let mut fix = Fixture::new(&[(180, 0)], vec![t]);
    let imp = fix.spawn(IMP_KIND, Vec2::new(40.0, 40.0), MapObjFlag::CountKill as u32, 0);
    let missile = fix.spawn(9, Vec2::new(40.0, 40.0), MapObjFlag::Missile as u32, 0);

    assert_eq!(actor_class(&fix.level, Some(fix.player)), ActorClass::Player);
    assert_eq!(actor_class(&fix.level, Some(imp)), ActorClass::Monster);
    assert_eq!(actor_class(&fix.level, Some(missile)), ActorClass::Missile);
    assert_eq!(actor_class(&fix.level, None), ActorClass::Other);

    assert!(!fix.use_line(0));
    assert!(!fix.cross_line(0));
    assert!(fix.use_by(0, 0, imp));

    fix.level.xg.options.any_trigger = true;
    assert!(fix.use_line(0));
}

#[test]
fn group_activation_forces_tagged_lines() {
    let mut leader = line_type(500, ClassId::None);
    leader.flags2 = LineTypeFlags2::GroupAct as u32 | LineTypeFlags2::GroupDeact as u32;
    let follower = command_type(501, "follower");
    let mut fix = Fixture::new(&[(500, 9), (501, 9), (501, 9), (501, 8)], vec![leader, follower]);

    assert!(fix.use_line(0));
    assert!(fix.xg(1).active && fix.xg(2).active);
    assert!(!fix.xg(3).active);
    // Forced, so no functions ran
    assert!(fix.game.commands.is_empty());

    assert!(fix.use_line(0));
    assert!(!fix.xg(1).active && !fix.xg(2).active);
}

#[test]
fn multiple_redelivers_chain_events() {
    let mut leader = line_type(500, ClassId::None);
    leader.flags2 = LineTypeFlags2::Multiple as u32;
    let follower = command_type(501, "follower");
    let mut fix = Fixture::new(&[(500, 9), (501, 9), (501, 9), (501, 8)], vec![leader, follower]);
    fix.xg_mut(2).active = true;

    assert!(fix.use_line(0));
    // Line 2 was already active
    assert_eq!(fix.game.commands.len(), 1);
    assert!(fix.xg(1).active && fix.xg(2).active);
    assert!(!fix.xg(3).active);

    assert!(fix.use_line(0));
    assert!(!fix.xg(1).active && !fix.xg(2).active);
    assert_eq!(fix.game.commands.len(), 1);
}

#[test]
fn activation_chain_uses_scratch_state() {
    let mut t = line_type(500, ClassId::None);
    t.act_chain = 501;
    t.act_count = 5;
    let mut chained = line_type(501, ClassId::Key);
    chained.iparm[0] = 1;
    chained.act_count = 1;
    let mut fix = Fixture::new(&[(500, 0)], vec![t, chained]);

    assert!(fix.use_line(0));
    assert!(fix.level.players[0].cards[0]);
    assert!(fix.xg(0).active);
    assert_eq!(fix.xg(0).info.id, 500);
    assert_eq!(fix.xg(0).info.act_count, 4);
    assert!(fix.level.xg.scratch.is_empty());
    // Swapped once, by the real line
    assert_eq!(fix.level.map_data.sidedefs()[0].top.material, Some(SWITCH_ON));
}

#[test]
fn switch_graphic_follows_state() {
    let mut fix = Fixture::new(&[(103, 0)], vec![command_type(103, "x")]);
    assert!(fix.use_line(0));
    assert_eq!(fix.level.map_data.sidedefs()[0].top.material, Some(SWITCH_ON));
    assert!(fix.use_line(0));
    assert_eq!(fix.level.map_data.sidedefs()[0].top.material, Some(SWITCH_OFF));
}

#[test]
fn messages_go_to_activator_or_everyone() {
    let mut local = line_type(600, ClassId::None);
    local.act_msg = "Local".to_string();
    let mut global = line_type(601, ClassId::None);
    global.act_msg = "Global".to_string();
    global.flags2 |= LineTypeFlags2::GlobalA as u32;
    let mut fix = Fixture::new(&[(600, 0), (601, 0)], vec![local, global]);
    let other = fix.spawn(PLAYER_KIND, Vec2::new(16.0, 16.0), 0, 0);
    fix.level.set_player(1, other);

    assert!(fix.use_line(0));
    assert_eq!(fix.level.players[0].message.as_deref(), Some("Local"));
    assert_eq!(fix.level.players[1].message, None);

    assert!(fix.use_line(1));
    assert_eq!(fix.level.players[0].message.as_deref(), Some("Global"));
    assert_eq!(fix.level.players[1].message.as_deref(), Some("Global"));
}

#[test]
fn side_effects_of_activation() {
    let mut t = line_type(700, ClassId::None);
    t.act_sound = 40;
    t.act_material = 77;
    t.wall_section = 2;
    t.act_line_type = 701;
    let next = line_type(701, ClassId::None);
    let mut fix = Fixture::new(&[(700, 0)], vec![t, next]);

    assert!(fix.use_line(0));
    let sounds = fix.sounds();
    assert!(matches!(sounds.as_slice(), [SoundAction::StartSfx { uid: SECTOR_SOUND_UID, sfx: 40, .. }]));
    assert_eq!(fix.level.map_data.sidedefs()[0].middle.material, Some(77));
    assert_eq!(fix.level.map_data.linedefs()[0].special, 701);
    assert_eq!(fix.xg(0).info.id, 701);
    assert!(!fix.xg(0).active);
}

#[test]
fn when_last_needs_count_of_one() {
    let mut two = command_type(800, "two");
    two.flags2 |= LineTypeFlags2::WhenLast as u32;
    two.act_count = 2;
    let mut three = command_type(801, "three");
    three.flags2 |= LineTypeFlags2::WhenLast as u32;
    three.act_count = 3;
    let mut fix = Fixture::new(&[(800, 0), (801, 0)], vec![two, three]);

    assert!(fix.use_line(0));
    assert_eq!(fix.game.commands, vec!["two".to_string()]);
    assert!(fix.use_line(1));
    assert_eq!(fix.game.commands.len(), 1);
}
