//! Typed class parameters, built once when a type is resolved so handlers
//! never index in to the raw parameter slots.

use crate::xg::class::ClassId;
use crate::xg::line_type::RawLineType;

/// A (kind, datum) reference pair. The kind stays numeric until it is used,
/// an unknown kind simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefParam {
    pub kind: i32,
    pub datum: i32,
}

/// Chain sequence option bits
pub enum ChainFlags {
    DeactivateWhenDone = 1,
    Loop = 1 << 1,
}

pub const CHAIN_FLAG_NAMES: &[(&str, u32)] = &[
    ("deactivate_when_done", ChainFlags::DeactivateWhenDone as u32),
    ("loop", ChainFlags::Loop as u32),
];

pub const KEY_NAMES: &[(&str, u32)] = &[
    ("blue_card", 1),
    ("yellow_card", 1 << 1),
    ("red_card", 1 << 2),
    ("blue_skull", 1 << 3),
    ("yellow_skull", 1 << 4),
    ("red_skull", 1 << 5),
];

/// Where a line teleport spawns its flash and plays its sound
pub enum FlashAt {
    Source = 1,
    Dest = 1 << 1,
}

pub const FLASH_NAMES: &[(&str, u32)] = &[("source", FlashAt::Source as u32), ("dest", FlashAt::Dest as u32)];

/// Number of sub-type slots in a chain sequence
pub const CHAIN_STEPS: usize = 19;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChainStep {
    pub line_type: i32,
    /// Seconds to wait before the next step fires
    pub interval: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChainSequenceParams {
    pub flags: u32,
    /// Percentage by which intervals are randomised
    pub randomness: f32,
    pub steps: Vec<ChainStep>,
}

impl ChainSequenceParams {
    /// Steps are numbered from 1. A step with no line type ends the sequence.
    pub fn step(&self, idx: usize) -> Option<&ChainStep> {
        idx.checked_sub(1)
            .and_then(|i| self.steps.get(i))
            .filter(|s| s.line_type != 0)
    }

    pub fn interval(&self, idx: usize) -> f32 {
        idx.checked_sub(1)
            .and_then(|i| self.steps.get(i))
            .map(|s| s.interval)
            .unwrap_or(0.0)
    }

    pub fn has_flag(&self, flag: ChainFlags) -> bool {
        self.flags & flag as u32 != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageParams {
    pub min: i32,
    pub max: i32,
    /// Health must be above this for anything to happen
    pub lower_limit: i32,
    /// Healing stops here
    pub upper_limit: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PowerParams {
    pub min: i32,
    pub max: i32,
    pub min_limit: i32,
    pub max_limit: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineTypeChangeParams {
    pub target: RefParam,
    pub new_type: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyParams {
    pub give: u32,
    pub take: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MusicParams {
    pub song: i32,
    pub looped: bool,
    /// Line data reference kind; when set the song id is read from the
    /// origin line instead of `song`
    pub data_ref: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCountParams {
    pub target: RefParam,
    /// Set the counter, or add to it
    pub set: bool,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeaveMapParams {
    pub secret: bool,
    /// Map number in the current episode, 0 for the next map
    pub map: i32,
    /// Line data reference kind; when set the map number is read from the
    /// origin line instead of `map`
    pub data_ref: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneMaterialParams {
    pub target: RefParam,
    pub material: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallMaterialParams {
    pub target: RefParam,
    /// 0 front, anything else back
    pub side: i32,
    /// Material ids, 0 leaves the section alone
    pub top: i32,
    pub middle: i32,
    pub bottom: i32,
    /// Remove the middle material when no new one is given
    pub clear_middle: bool,
    /// ORed in to the side flags
    pub side_flags: u32,
    pub blend_mode: i32,
    /// Colour components 0..255, 0 leaves the component alone
    pub top_rgb: [i32; 3],
    pub middle_rgba: [i32; 4],
    pub bottom_rgb: [i32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectorSoundParams {
    pub target: RefParam,
    pub sound: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectorLightParams {
    pub target: RefParam,
    pub absolute: bool,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineTeleportParams {
    pub target: RefParam,
    /// Thing type spawned as the teleport flash, 0 for none
    pub flash_type: i32,
    /// `FlashAt` bits
    pub flash_at: u32,
    pub sound: i32,
    pub reversed: bool,
    pub telefrag: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClassParams {
    #[default]
    None,
    ChainSequence(ChainSequenceParams),
    Damage(DamageParams),
    Power(PowerParams),
    LineTypeChange(LineTypeChangeParams),
    Activate(RefParam),
    Deactivate(RefParam),
    Key(KeyParams),
    Music(MusicParams),
    LineCount(LineCountParams),
    LeaveMap(LeaveMapParams),
    DisableIfActive(RefParam),
    EnableIfActive(RefParam),
    Explode,
    PlaneMaterial(PlaneMaterialParams),
    WallMaterial(WallMaterialParams),
    Command(String),
    SectorSound(SectorSoundParams),
    SectorLight(SectorLightParams),
    LineTeleport(LineTeleportParams),
}

impl ClassParams {
    pub fn from_raw(class: ClassId, raw: &RawLineType) -> Self {
        let ip = &raw.iparm;
        let info = class.info();
        let target = RefParam {
            kind: ip[info.trav_ref],
            datum: ip[info.trav_data],
        };

        match class {
            ClassId::None => ClassParams::None,
            ClassId::ChainSequence => ClassParams::ChainSequence(ChainSequenceParams {
                flags: ip[0] as u32,
                randomness: raw.fparm[0],
                steps: (1..=CHAIN_STEPS)
                    .map(|i| ChainStep {
                        line_type: ip[i],
                        interval: raw.fparm[i],
                    })
                    .collect(),
            }),
            ClassId::Damage => ClassParams::Damage(DamageParams {
                min: ip[0],
                max: ip[1],
                lower_limit: ip[2],
                upper_limit: ip[3],
            }),
            ClassId::Power => ClassParams::Power(PowerParams {
                min: ip[0],
                max: ip[1],
                min_limit: ip[2],
                max_limit: ip[3],
            }),
            ClassId::LineTypeChange => ClassParams::LineTypeChange(LineTypeChangeParams {
                target,
                new_type: ip[2],
            }),
            ClassId::Activate => ClassParams::Activate(target),
            ClassId::Deactivate => ClassParams::Deactivate(target),
            ClassId::Key => ClassParams::Key(KeyParams {
                give: ip[0] as u32,
                take: ip[1] as u32,
            }),
            ClassId::Music => ClassParams::Music(MusicParams {
                song: ip[0],
                looped: ip[1] != 0,
                data_ref: ip[2],
            }),
            ClassId::LineCount => ClassParams::LineCount(LineCountParams {
                target,
                set: ip[2] != 0,
                value: ip[3],
            }),
            ClassId::LeaveMap => ClassParams::LeaveMap(LeaveMapParams {
                secret: ip[0] != 0,
                map: ip[1],
                data_ref: ip[2],
            }),
            ClassId::DisableIfActive => ClassParams::DisableIfActive(target),
            ClassId::EnableIfActive => ClassParams::EnableIfActive(target),
            ClassId::Explode => ClassParams::Explode,
            ClassId::PlaneMaterial => ClassParams::PlaneMaterial(PlaneMaterialParams {
                target,
                material: ip[2],
            }),
            ClassId::WallMaterial => ClassParams::WallMaterial(WallMaterialParams {
                target,
                side: ip[2],
                top: ip[3],
                middle: ip[4],
                bottom: ip[5],
                clear_middle: ip[6] != 0,
                side_flags: ip[7] as u32,
                blend_mode: ip[8],
                top_rgb: [ip[9], ip[10], ip[11]],
                middle_rgba: [ip[12], ip[13], ip[14], ip[15]],
                bottom_rgb: [ip[16], ip[17], ip[18]],
            }),
            ClassId::Command => ClassParams::Command(raw.sparm[0].clone()),
            ClassId::SectorSound => ClassParams::SectorSound(SectorSoundParams {
                target,
                sound: ip[2],
            }),
            ClassId::SectorLight => ClassParams::SectorLight(SectorLightParams {
                target,
                absolute: ip[2] != 0,
                value: ip[3],
            }),
            ClassId::LineTeleport => ClassParams::LineTeleport(LineTeleportParams {
                target,
                flash_type: ip[2],
                flash_at: ip[3] as u32,
                sound: ip[4],
                reversed: ip[5] != 0,
                telefrag: ip[6] != 0,
            }),
        }
    }

    /// The reference a traversing class walks
    pub fn target(&self) -> Option<RefParam> {
        match self {
            ClassParams::LineTypeChange(p) => Some(p.target),
            ClassParams::Activate(r)
            | ClassParams::Deactivate(r)
            | ClassParams::DisableIfActive(r)
            | ClassParams::EnableIfActive(r) => Some(*r),
            ClassParams::LineCount(p) => Some(p.target),
            ClassParams::PlaneMaterial(p) => Some(p.target),
            ClassParams::WallMaterial(p) => Some(p.target),
            ClassParams::SectorSound(p) => Some(p.target),
            ClassParams::SectorLight(p) => Some(p.target),
            ClassParams::LineTeleport(p) => Some(p.target),
            _ => None,
        }
    }
}
