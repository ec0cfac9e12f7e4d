//! Line type descriptors. `RawLineType` is what gets stored and compiled,
//! `LineType` is the checked form every line carries a copy of.

use serde::{Deserialize, Serialize};

use crate::XgError;
use crate::xg::class::ClassId;
use crate::xg::params::ClassParams;

pub const MAX_PARAMS: usize = 20;
pub const MAX_APARAMS: usize = 10;
pub const MAX_SPARAMS: usize = 5;

/// What caused a line event
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Fired by another line's chain
    Chain = 0,
    Cross = 1,
    Use = 2,
    Shoot = 3,
    Hit = 4,
    Ticker = 5,
    /// Counted types reverting after their time runs out
    Auto = 6,
    /// The scheduler calling the function directly
    Forced = 7,
    /// Delivered by another line's function
    Func = 8,
}

impl EventKind {
    pub fn bit(self) -> u32 {
        1 << self as u32
    }

    /// Row of the trigger grid in `LineType::flags`
    fn trigger_slot(self) -> Option<u32> {
        match self {
            EventKind::Use => Some(0),
            EventKind::Cross => Some(1),
            EventKind::Shoot => Some(2),
            EventKind::Hit => Some(3),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "chain" => EventKind::Chain,
            "cross" => EventKind::Cross,
            "use" => EventKind::Use,
            "shoot" => EventKind::Shoot,
            "hit" => EventKind::Hit,
            "ticker" => EventKind::Ticker,
            "auto" => EventKind::Auto,
            "forced" => EventKind::Forced,
            "func" => EventKind::Func,
            _ => return None,
        })
    }
}

/// Who is doing the activating, for the trigger grid
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActorClass {
    Player = 0,
    Monster = 1,
    Missile = 2,
    Other = 3,
}

impl ActorClass {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "player" => ActorClass::Player,
            "monster" => ActorClass::Monster,
            "missile" => ActorClass::Missile,
            "other" => ActorClass::Other,
            _ => return None,
        })
    }
}

/// Bit of the trigger grid for this event, actor and direction
pub fn trigger_flag(event: EventKind, actor: ActorClass, deactivate: bool) -> u32 {
    match event.trigger_slot() {
        Some(slot) => 1 << (slot * 8 + actor as u32 * 2 + deactivate as u32),
        None => 0,
    }
}

/// Parse a trigger grid name like `player_use_a` or `monster_cross_d`
pub fn trigger_flag_from_name(name: &str) -> Option<u32> {
    let mut parts = name.split('_');
    let actor = ActorClass::from_name(parts.next()?)?;
    let event = EventKind::from_name(parts.next()?)?;
    let deactivate = match parts.next()? {
        "a" => false,
        "d" => true,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    let flag = trigger_flag(event, actor, deactivate);
    (flag != 0).then_some(flag)
}

/// How the activation counter limits the direction of events
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ActType {
    /// Events toggle the line both ways
    #[default]
    Always = 0,
    /// Events may only activate; time reverts the line to inactive
    CountedOff = 1,
    /// Events may only deactivate; time reverts the line to active
    CountedOn = 2,
    /// Both ways, time reverts an active line
    FlipCountedOff = 3,
    /// Both ways, time reverts an inactive line
    FlipCountedOn = 4,
}

impl ActType {
    pub fn from_u8(n: u8) -> Option<Self> {
        Some(match n {
            0 => ActType::Always,
            1 => ActType::CountedOff,
            2 => ActType::CountedOn,
            3 => ActType::FlipCountedOff,
            4 => ActType::FlipCountedOn,
            _ => return None,
        })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "always" => ActType::Always,
            "counted_off" => ActType::CountedOff,
            "counted_on" => ActType::CountedOn,
            "flip_counted_off" => ActType::FlipCountedOff,
            "flip_counted_on" => ActType::FlipCountedOn,
            _ => return None,
        })
    }

    /// Types that time out of the active state
    pub fn reverts_active(self) -> bool {
        matches!(self, ActType::CountedOff | ActType::FlipCountedOff)
    }

    /// Types that time out of the inactive state
    pub fn reverts_inactive(self) -> bool {
        matches!(self, ActType::CountedOn | ActType::FlipCountedOn)
    }
}

/// Second flag set of a line type
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineTypeFlags2 {
    /// Starts active
    Active = 1,
    /// Ticker events may activate
    TickerA = 1 << 1,
    /// Ticker events may deactivate
    TickerD = 1 << 2,
    /// All things of the gate thing type must be gone
    MobjGone = 1 << 3,
    /// Non-players may not use secret lines
    NoOtherUseSecret = 1 << 4,
    /// The activator must be of the gate thing type
    ActivatorType = 1 << 5,
    /// Events from both sides are accepted
    TwoSided = 1 << 6,
    HealthAbove = 1 << 7,
    HealthBelow = 1 << 8,
    PowerAbove = 1 << 9,
    PowerBelow = 1 << 10,
    /// Referenced lines must all be active
    LineActive = 1 << 11,
    /// Referenced lines must all be inactive
    LineInactive = 1 << 12,
    /// The activator must have the gate colour
    Color = 1 << 13,
    SinglePlayer = 1 << 14,
    Cooperative = 1 << 15,
    Deathmatch = 1 << 16,
    /// Do the function when activated
    WhenActivated = 1 << 17,
    /// Do the function when deactivated
    WhenDeactivated = 1 << 18,
    /// The scheduler forces the function while active
    WhenActive = 1 << 19,
    /// The scheduler forces the function while inactive
    WhenInactive = 1 << 20,
    /// Only do the function on the last counted activation
    WhenLast = 1 << 21,
    /// Chain events to line-tagged lines in the other state
    Multiple = 1 << 22,
    /// Force line-tagged lines active on activation
    GroupAct = 1 << 23,
    /// Force line-tagged lines inactive on deactivation
    GroupDeact = 1 << 24,
    /// Activation message goes to every player
    GlobalA = 1 << 25,
    /// Deactivation message goes to every player
    GlobalD = 1 << 26,
    /// Any use, cross, shoot or hit event triggers
    AnyTrigger = 1 << 27,
}

pub const FLAGS2_NAMES: &[(&str, LineTypeFlags2)] = &[
    ("active", LineTypeFlags2::Active),
    ("ticker_a", LineTypeFlags2::TickerA),
    ("ticker_d", LineTypeFlags2::TickerD),
    ("mobj_gone", LineTypeFlags2::MobjGone),
    ("no_other_use_secret", LineTypeFlags2::NoOtherUseSecret),
    ("activator_type", LineTypeFlags2::ActivatorType),
    ("two_sided", LineTypeFlags2::TwoSided),
    ("health_above", LineTypeFlags2::HealthAbove),
    ("health_below", LineTypeFlags2::HealthBelow),
    ("power_above", LineTypeFlags2::PowerAbove),
    ("power_below", LineTypeFlags2::PowerBelow),
    ("line_active", LineTypeFlags2::LineActive),
    ("line_inactive", LineTypeFlags2::LineInactive),
    ("color", LineTypeFlags2::Color),
    ("single_player", LineTypeFlags2::SinglePlayer),
    ("cooperative", LineTypeFlags2::Cooperative),
    ("deathmatch", LineTypeFlags2::Deathmatch),
    ("when_activated", LineTypeFlags2::WhenActivated),
    ("when_deactivated", LineTypeFlags2::WhenDeactivated),
    ("when_active", LineTypeFlags2::WhenActive),
    ("when_inactive", LineTypeFlags2::WhenInactive),
    ("when_last", LineTypeFlags2::WhenLast),
    ("multiple", LineTypeFlags2::Multiple),
    ("group_act", LineTypeFlags2::GroupAct),
    ("group_deact", LineTypeFlags2::GroupDeact),
    ("global_a", LineTypeFlags2::GlobalA),
    ("global_d", LineTypeFlags2::GlobalD),
    ("any_trigger", LineTypeFlags2::AnyTrigger),
];

/// Third flag set of a line type: skill and key gates
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineTypeFlags3 {
    Skill1 = 1,
    Skill2 = 1 << 1,
    Skill3 = 1 << 2,
    Skill4 = 1 << 3,
    Skill5 = 1 << 4,
    /// Blue card
    Key1 = 1 << 5,
    /// Yellow card
    Key2 = 1 << 6,
    /// Red card
    Key3 = 1 << 7,
    /// Blue skull
    Key4 = 1 << 8,
    /// Yellow skull
    Key5 = 1 << 9,
    /// Red skull
    Key6 = 1 << 10,
}

pub const SKILL_MASK: u32 = 0x1f;
pub const KEY_SHIFT: u32 = 5;
pub const KEY_MASK: u32 = 0x3f << KEY_SHIFT;

pub const FLAGS3_NAMES: &[(&str, LineTypeFlags3)] = &[
    ("skill1", LineTypeFlags3::Skill1),
    ("skill2", LineTypeFlags3::Skill2),
    ("skill3", LineTypeFlags3::Skill3),
    ("skill4", LineTypeFlags3::Skill4),
    ("skill5", LineTypeFlags3::Skill5),
    ("key1", LineTypeFlags3::Key1),
    ("key2", LineTypeFlags3::Key2),
    ("key3", LineTypeFlags3::Key3),
    ("key4", LineTypeFlags3::Key4),
    ("key5", LineTypeFlags3::Key5),
    ("key6", LineTypeFlags3::Key6),
];

/// The stored form of a line type, as found in a compiled lump or built from
/// a text definition. Parameters are plain slots, given meaning by the class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLineType {
    pub id: i32,
    pub flags: u32,
    pub flags2: u32,
    pub flags3: u32,
    pub line_class: u8,
    pub act_type: u8,
    /// -1 for unlimited
    pub act_count: i32,
    /// Seconds before a counted type reverts, < 0 for never
    pub act_time: f32,
    pub act_tag: i32,
    /// Activation gate values: 0 health above, 1 health below, 2 power
    /// above, 3 power below, 4/5 line active ref, 6/7 line inactive ref,
    /// 8 colour, 9 thing type
    pub aparm: [i32; MAX_APARAMS],
    pub ticker_start: f32,
    pub ticker_end: f32,
    pub ticker_interval: f32,
    pub act_sound: i32,
    pub deact_sound: i32,
    pub ev_chain: i32,
    pub act_chain: i32,
    pub deact_chain: i32,
    pub act_line_type: i32,
    pub deact_line_type: i32,
    pub wall_section: i32,
    pub act_material: i32,
    pub deact_material: i32,
    pub act_msg: String,
    pub deact_msg: String,
    pub material_move_angle: f32,
    pub material_move_speed: f32,
    pub iparm: [i32; MAX_PARAMS],
    pub fparm: [f32; MAX_PARAMS],
    pub sparm: [String; MAX_SPARAMS],
}

impl Default for RawLineType {
    fn default() -> Self {
        Self {
            id: 0,
            flags: 0,
            flags2: 0,
            flags3: 0,
            line_class: 0,
            act_type: 0,
            act_count: -1,
            act_time: -1.0,
            act_tag: 0,
            aparm: [0; MAX_APARAMS],
            ticker_start: 0.0,
            ticker_end: 0.0,
            ticker_interval: 0.0,
            act_sound: 0,
            deact_sound: 0,
            ev_chain: 0,
            act_chain: 0,
            deact_chain: 0,
            act_line_type: 0,
            deact_line_type: 0,
            wall_section: 0,
            act_material: 0,
            deact_material: 0,
            act_msg: String::new(),
            deact_msg: String::new(),
            material_move_angle: 0.0,
            material_move_speed: 0.0,
            iparm: [0; MAX_PARAMS],
            fparm: [0.0; MAX_PARAMS],
            sparm: Default::default(),
        }
    }
}

/// Values checked by the activation gates in `LineTypeFlags2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivationGates {
    pub health_above: i32,
    pub health_below: i32,
    pub power_above: i32,
    pub power_below: i32,
    /// Line reference (kind, datum) that must all be active
    pub line_active: (i32, i32),
    /// Line reference (kind, datum) that must all be inactive
    pub line_inactive: (i32, i32),
    pub color: i32,
    /// Thing type for the activator-type and mobj-gone gates
    pub thing_type: i32,
}

/// A resolved line type. Each line owns its own copy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineType {
    pub id: i32,
    /// Trigger grid, see `trigger_flag()`
    pub flags: u32,
    pub flags2: u32,
    pub flags3: u32,
    pub class: ClassId,
    pub act_type: ActType,
    pub act_count: i32,
    pub act_time: f32,
    pub act_tag: i32,
    pub gates: ActivationGates,
    pub ticker_start: f32,
    pub ticker_end: f32,
    pub ticker_interval: f32,
    pub act_sound: i32,
    pub deact_sound: i32,
    pub ev_chain: i32,
    pub act_chain: i32,
    pub deact_chain: i32,
    pub act_line_type: i32,
    pub deact_line_type: i32,
    pub wall_section: i32,
    pub act_material: i32,
    pub deact_material: i32,
    pub act_msg: String,
    pub deact_msg: String,
    pub material_move_angle: f32,
    pub material_move_speed: f32,
    pub params: ClassParams,
}

impl LineType {
    pub fn from_raw(raw: &RawLineType) -> Result<Self, XgError> {
        let class = ClassId::from_u8(raw.line_class)
            .ok_or_else(|| XgError::Parse(format!("type {}: no line class {}", raw.id, raw.line_class)))?;
        let act_type = ActType::from_u8(raw.act_type)
            .ok_or_else(|| XgError::Parse(format!("type {}: no activation type {}", raw.id, raw.act_type)))?;
        let a = &raw.aparm;

        Ok(Self {
            id: raw.id,
            flags: raw.flags,
            flags2: raw.flags2,
            flags3: raw.flags3,
            class,
            act_type,
            act_count: raw.act_count,
            act_time: raw.act_time,
            act_tag: raw.act_tag,
            gates: ActivationGates {
                health_above: a[0],
                health_below: a[1],
                power_above: a[2],
                power_below: a[3],
                line_active: (a[4], a[5]),
                line_inactive: (a[6], a[7]),
                color: a[8],
                thing_type: a[9],
            },
            ticker_start: raw.ticker_start,
            ticker_end: raw.ticker_end,
            ticker_interval: raw.ticker_interval,
            act_sound: raw.act_sound,
            deact_sound: raw.deact_sound,
            ev_chain: raw.ev_chain,
            act_chain: raw.act_chain,
            deact_chain: raw.deact_chain,
            act_line_type: raw.act_line_type,
            deact_line_type: raw.deact_line_type,
            wall_section: raw.wall_section,
            act_material: raw.act_material,
            deact_material: raw.deact_material,
            act_msg: raw.act_msg.clone(),
            deact_msg: raw.deact_msg.clone(),
            material_move_angle: raw.material_move_angle,
            material_move_speed: raw.material_move_speed,
            params: ClassParams::from_raw(class, raw),
        })
    }

    pub fn has_flag2(&self, flag: LineTypeFlags2) -> bool {
        self.flags2 & flag as u32 != 0
    }

    pub fn has_flag3(&self, flag: LineTypeFlags3) -> bool {
        self.flags3 & flag as u32 != 0
    }

    /// Does the trigger grid accept this event from this actor
    pub fn triggered_by(&self, event: EventKind, actor: ActorClass, deactivate: bool) -> bool {
        self.flags & trigger_flag(event, actor, deactivate) != 0
    }

    /// Mask of required keys, bit 0 being the blue card
    pub fn keys(&self) -> u32 {
        (self.flags3 & KEY_MASK) >> KEY_SHIFT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_grid_layout() {
        assert_eq!(trigger_flag(EventKind::Use, ActorClass::Player, false), 1);
        assert_eq!(trigger_flag(EventKind::Use, ActorClass::Player, true), 1 << 1);
        assert_eq!(trigger_flag(EventKind::Cross, ActorClass::Monster, false), 1 << 10);
        assert_eq!(trigger_flag(EventKind::Hit, ActorClass::Other, true), 1 << 31);
        assert_eq!(trigger_flag(EventKind::Ticker, ActorClass::Player, false), 0);
        assert_eq!(trigger_flag_from_name("missile_shoot_a"), Some(1 << 20));
        assert_eq!(trigger_flag_from_name("player_ticker_a"), None);
        assert_eq!(trigger_flag_from_name("player_use"), None);
    }

    #[test]
    fn raw_to_typed() {
        let raw = RawLineType {
            id: 1200,
            line_class: 7,
            act_type: 1,
            act_count: 2,
            flags3: LineTypeFlags3::Key2 as u32 | LineTypeFlags3::Skill3 as u32,
            aparm: [5, 0, 0, 0, 2, 9, 0, 0, 3, 3004],
            ..RawLineType::default()
        };
        let info = LineType::from_raw(&raw).unwrap();
        assert_eq!(info.class, ClassId::Key);
        assert_eq!(info.act_type, ActType::CountedOff);
        assert_eq!(info.gates.health_above, 5);
        assert_eq!(info.gates.line_active, (2, 9));
        assert_eq!(info.gates.thing_type, 3004);
        assert_eq!(info.keys(), 0b10);
        assert!(info.has_flag3(LineTypeFlags3::Skill3));
    }

    #[test]
    fn bad_class_is_an_error() {
        let raw = RawLineType {
            id: 3,
            line_class: 200,
            ..RawLineType::default()
        };
        assert!(LineType::from_raw(&raw).is_err());
    }
}
