//! The class table. Every line type names one class, which decides what its
//! function does, what it walks over, and what its parameter slots mean.

use xg_traits::GameTraits;

use crate::Level;
use crate::xg::functions::*;
use crate::xg::line_type::EventKind;
use crate::xg::params::{CHAIN_FLAG_NAMES, FLASH_NAMES, KEY_NAMES};
use crate::xg::{LineCtx, XgCall};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassId {
    #[default]
    None = 0,
    ChainSequence = 1,
    Damage = 2,
    Power = 3,
    LineTypeChange = 4,
    Activate = 5,
    Deactivate = 6,
    Key = 7,
    Music = 8,
    LineCount = 9,
    LeaveMap = 10,
    DisableIfActive = 11,
    EnableIfActive = 12,
    Explode = 13,
    PlaneMaterial = 14,
    WallMaterial = 15,
    Command = 16,
    SectorSound = 17,
    SectorLight = 18,
    LineTeleport = 19,
}

pub const CLASS_COUNT: usize = 20;

impl ClassId {
    pub fn from_u8(n: u8) -> Option<Self> {
        XG_CLASSES.get(n as usize).map(|c| c.id)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        XG_CLASSES.iter().find(|c| c.name == name).map(|c| c.id)
    }

    pub fn info(self) -> &'static ClassInfo {
        &XG_CLASSES[self as usize]
    }
}

/// How a text definition value for a slot should be read
#[derive(Debug, Clone, Copy)]
pub enum ParmHint {
    Int,
    Float,
    Str,
    LineRef,
    PlaneRef,
    LineDataRef,
    /// Names joined with `|`, ORed together
    Flags(&'static [(&'static str, u32)]),
}

/// Which raw parameter slot(s) a named parameter lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Int(usize),
    Float(usize),
    Str(usize),
    /// First slot and count
    IntRange(usize, usize),
    FloatRange(usize, usize),
}

#[derive(Debug, Clone, Copy)]
pub struct ParmSchema {
    pub name: &'static str,
    pub slot: Slot,
    pub hint: ParmHint,
}

impl ParmSchema {
    const fn new(name: &'static str, slot: Slot, hint: ParmHint) -> Self {
        Self { name, slot, hint }
    }
}

pub type InitFunc = fn(&mut Level, &XgCall);
pub type DirectFunc = fn(&mut Level, &mut dyn GameTraits, &XgCall);
/// Returns false to stop the traversal
pub type LineFunc = fn(&mut Level, &mut dyn GameTraits, &XgCall, Option<LineCtx>) -> bool;
/// Gets the sector and whether the ceiling is meant. Returns false to stop
/// the traversal.
pub type PlaneFunc = fn(&mut Level, &mut dyn GameTraits, &XgCall, Option<usize>, bool) -> bool;

#[derive(Debug, Clone, Copy)]
pub enum ClassFunc {
    Nothing,
    /// Called once on the origin line
    Direct(DirectFunc),
    /// Called for each referenced line
    Lines(LineFunc),
    /// Called for each referenced plane
    Planes(PlaneFunc),
    /// Called for each referenced sector
    Sectors(PlaneFunc),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Traverse {
    None,
    Lines,
    Planes,
    Sectors,
}

#[derive(Debug)]
pub struct ClassInfo {
    pub id: ClassId,
    pub name: &'static str,
    pub func: ClassFunc,
    /// Runs before `func` every time the function is done
    pub init: Option<InitFunc>,
    /// Int slots holding the reference kind and datum for traversals
    pub trav_ref: usize,
    pub trav_data: usize,
    /// `EventKind` bits the function may run for, 0 for all
    pub ev_type_flags: u32,
    pub schema: &'static [ParmSchema],
}

impl ClassInfo {
    pub fn traverse(&self) -> Traverse {
        match self.func {
            ClassFunc::Nothing | ClassFunc::Direct(_) => Traverse::None,
            ClassFunc::Lines(_) => Traverse::Lines,
            ClassFunc::Planes(_) => Traverse::Planes,
            ClassFunc::Sectors(_) => Traverse::Sectors,
        }
    }

    pub fn accepts(&self, ev: EventKind) -> bool {
        self.ev_type_flags == 0 || self.ev_type_flags & ev.bit() != 0
    }

    pub fn param(&self, name: &str) -> Option<&ParmSchema> {
        self.schema.iter().find(|p| p.name == name)
    }
}

const fn class(
    id: ClassId,
    name: &'static str,
    func: ClassFunc,
    schema: &'static [ParmSchema],
) -> ClassInfo {
    ClassInfo {
        id,
        name,
        func,
        init: None,
        trav_ref: 0,
        trav_data: 1,
        ev_type_flags: 0,
        schema,
    }
}

const REF_SCHEMA: ParmSchema = ParmSchema::new("ref", Slot::Int(0), ParmHint::LineRef);
const PLANE_REF_SCHEMA: ParmSchema = ParmSchema::new("ref", Slot::Int(0), ParmHint::PlaneRef);
const REF_DATA_SCHEMA: ParmSchema = ParmSchema::new("ref_data", Slot::Int(1), ParmHint::Int);

const CHAIN_SCHEMA: &[ParmSchema] = &[
    ParmSchema::new("flags", Slot::Int(0), ParmHint::Flags(CHAIN_FLAG_NAMES)),
    ParmSchema::new("types", Slot::IntRange(1, 19), ParmHint::Int),
    ParmSchema::new("randomness", Slot::Float(0), ParmHint::Float),
    ParmSchema::new("intervals", Slot::FloatRange(1, 19), ParmHint::Float),
];

const DAMAGE_SCHEMA: &[ParmSchema] = &[
    ParmSchema::new("min", Slot::Int(0), ParmHint::Int),
    ParmSchema::new("max", Slot::Int(1), ParmHint::Int),
    ParmSchema::new("lower_limit", Slot::Int(2), ParmHint::Int),
    ParmSchema::new("upper_limit", Slot::Int(3), ParmHint::Int),
];

const POWER_SCHEMA: &[ParmSchema] = &[
    ParmSchema::new("min", Slot::Int(0), ParmHint::Int),
    ParmSchema::new("max", Slot::Int(1), ParmHint::Int),
    ParmSchema::new("min_limit", Slot::Int(2), ParmHint::Int),
    ParmSchema::new("max_limit", Slot::Int(3), ParmHint::Int),
];

const LINE_TYPE_CHANGE_SCHEMA: &[ParmSchema] = &[
    REF_SCHEMA,
    REF_DATA_SCHEMA,
    ParmSchema::new("new_type", Slot::Int(2), ParmHint::Int),
];

const LINES_SCHEMA: &[ParmSchema] = &[REF_SCHEMA, REF_DATA_SCHEMA];

const KEY_SCHEMA: &[ParmSchema] = &[
    ParmSchema::new("give", Slot::Int(0), ParmHint::Flags(KEY_NAMES)),
    ParmSchema::new("take", Slot::Int(1), ParmHint::Flags(KEY_NAMES)),
];

const MUSIC_SCHEMA: &[ParmSchema] = &[
    ParmSchema::new("song", Slot::Int(0), ParmHint::Int),
    ParmSchema::new("looped", Slot::Int(1), ParmHint::Int),
    ParmSchema::new("data_ref", Slot::Int(2), ParmHint::LineDataRef),
];

const LINE_COUNT_SCHEMA: &[ParmSchema] = &[
    REF_SCHEMA,
    REF_DATA_SCHEMA,
    ParmSchema::new("set", Slot::Int(2), ParmHint::Int),
    ParmSchema::new("value", Slot::Int(3), ParmHint::Int),
];

const LEAVE_MAP_SCHEMA: &[ParmSchema] = &[
    ParmSchema::new("secret", Slot::Int(0), ParmHint::Int),
    ParmSchema::new("map", Slot::Int(1), ParmHint::Int),
    ParmSchema::new("data_ref", Slot::Int(2), ParmHint::LineDataRef),
];

const PLANE_MATERIAL_SCHEMA: &[ParmSchema] = &[
    PLANE_REF_SCHEMA,
    REF_DATA_SCHEMA,
    ParmSchema::new("material", Slot::Int(2), ParmHint::Int),
];

const WALL_MATERIAL_SCHEMA: &[ParmSchema] = &[
    REF_SCHEMA,
    REF_DATA_SCHEMA,
    ParmSchema::new("side", Slot::Int(2), ParmHint::Int),
    ParmSchema::new("top", Slot::Int(3), ParmHint::Int),
    ParmSchema::new("middle", Slot::Int(4), ParmHint::Int),
    ParmSchema::new("bottom", Slot::Int(5), ParmHint::Int),
    ParmSchema::new("clear_middle", Slot::Int(6), ParmHint::Int),
    ParmSchema::new("side_flags", Slot::Int(7), ParmHint::Int),
    ParmSchema::new("blend_mode", Slot::Int(8), ParmHint::Int),
    ParmSchema::new("top_rgb", Slot::IntRange(9, 3), ParmHint::Int),
    ParmSchema::new("middle_rgba", Slot::IntRange(12, 4), ParmHint::Int),
    ParmSchema::new("bottom_rgb", Slot::IntRange(16, 3), ParmHint::Int),
];

const COMMAND_SCHEMA: &[ParmSchema] = &[ParmSchema::new("command", Slot::Str(0), ParmHint::Str)];

const SECTOR_SOUND_SCHEMA: &[ParmSchema] = &[
    PLANE_REF_SCHEMA,
    REF_DATA_SCHEMA,
    ParmSchema::new("sound", Slot::Int(2), ParmHint::Int),
];

const SECTOR_LIGHT_SCHEMA: &[ParmSchema] = &[
    PLANE_REF_SCHEMA,
    REF_DATA_SCHEMA,
    ParmSchema::new("absolute", Slot::Int(2), ParmHint::Int),
    ParmSchema::new("value", Slot::Int(3), ParmHint::Int),
];

const LINE_TELEPORT_SCHEMA: &[ParmSchema] = &[
    REF_SCHEMA,
    REF_DATA_SCHEMA,
    ParmSchema::new("flash_type", Slot::Int(2), ParmHint::Int),
    ParmSchema::new("flash_at", Slot::Int(3), ParmHint::Flags(FLASH_NAMES)),
    ParmSchema::new("sound", Slot::Int(4), ParmHint::Int),
    ParmSchema::new("reversed", Slot::Int(5), ParmHint::Int),
    ParmSchema::new("telefrag", Slot::Int(6), ParmHint::Int),
];

/// Indexed by `ClassId`
pub static XG_CLASSES: [ClassInfo; CLASS_COUNT] = [
    class(ClassId::None, "none", ClassFunc::Nothing, &[]),
    ClassInfo {
        init: Some(init_chain_sequence),
        ..class(ClassId::ChainSequence, "chain_sequence", ClassFunc::Nothing, CHAIN_SCHEMA)
    },
    class(ClassId::Damage, "damage", ClassFunc::Direct(do_damage), DAMAGE_SCHEMA),
    class(ClassId::Power, "power", ClassFunc::Direct(do_power), POWER_SCHEMA),
    class(
        ClassId::LineTypeChange,
        "line_type_change",
        ClassFunc::Lines(trav_line_type_change),
        LINE_TYPE_CHANGE_SCHEMA,
    ),
    class(ClassId::Activate, "activate", ClassFunc::Lines(trav_activate), LINES_SCHEMA),
    class(ClassId::Deactivate, "deactivate", ClassFunc::Lines(trav_deactivate), LINES_SCHEMA),
    class(ClassId::Key, "key", ClassFunc::Direct(do_key), KEY_SCHEMA),
    class(ClassId::Music, "music", ClassFunc::Direct(do_music), MUSIC_SCHEMA),
    class(ClassId::LineCount, "line_count", ClassFunc::Lines(trav_line_count), LINE_COUNT_SCHEMA),
    class(ClassId::LeaveMap, "leave_map", ClassFunc::Direct(do_leave_map), LEAVE_MAP_SCHEMA),
    class(
        ClassId::DisableIfActive,
        "disable_if_active",
        ClassFunc::Lines(trav_disable_if_active),
        LINES_SCHEMA,
    ),
    class(
        ClassId::EnableIfActive,
        "enable_if_active",
        ClassFunc::Lines(trav_enable_if_active),
        LINES_SCHEMA,
    ),
    class(ClassId::Explode, "explode", ClassFunc::Direct(do_explode), &[]),
    class(
        ClassId::PlaneMaterial,
        "plane_material",
        ClassFunc::Planes(trav_plane_material),
        PLANE_MATERIAL_SCHEMA,
    ),
    class(
        ClassId::WallMaterial,
        "wall_material",
        ClassFunc::Lines(trav_wall_material),
        WALL_MATERIAL_SCHEMA,
    ),
    class(ClassId::Command, "command", ClassFunc::Direct(do_command), COMMAND_SCHEMA),
    class(
        ClassId::SectorSound,
        "sector_sound",
        ClassFunc::Planes(trav_sector_sound),
        SECTOR_SOUND_SCHEMA,
    ),
    class(
        ClassId::SectorLight,
        "sector_light",
        ClassFunc::Sectors(trav_sector_light),
        SECTOR_LIGHT_SCHEMA,
    ),
    ClassInfo {
        ev_type_flags: 1 << EventKind::Cross as u32,
        ..class(
            ClassId::LineTeleport,
            "line_teleport",
            ClassFunc::Lines(trav_line_teleport),
            LINE_TELEPORT_SCHEMA,
        )
    },
];
