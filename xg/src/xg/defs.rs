//! Text line type definitions. A TOML file holds any number of
//! `[[line_type]]` tables which are turned in to `RawLineType`s, with names
//! accepted wherever a number would be awkward to write by hand.
//!
//! ```toml
//! [[line_type]]
//! id = 1200
//! class = "key"
//! triggers = ["player_use_a"]
//! flags = ["when_activated"]
//! count = 1
//! params = { give = "red_card|blue_skull" }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::XgError;
use crate::level::map_defs::SectionKind;
use crate::xg::class::{ClassId, ParmHint, ParmSchema, Slot};
use crate::xg::line_type::{
    trigger_flag_from_name, ActType, RawLineType, FLAGS2_NAMES, FLAGS3_NAMES, LineTypeFlags2,
};
use crate::xg::traverse::{LineDataRef, LineRef, PlaneRef};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NameOrNum {
    Num(i64),
    Name(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParmValue {
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<ParmValue>),
}

/// What happens on one direction of a state change
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SideEffectsDef {
    pub chain: i32,
    pub sound: i32,
    pub line_type: i32,
    pub material: i32,
    pub msg: String,
}

/// Activation gates. Giving a value turns the matching gate on.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatesDef {
    pub health_above: Option<i32>,
    pub health_below: Option<i32>,
    pub power_above: Option<i32>,
    pub power_below: Option<i32>,
    /// Line reference (kind, datum)
    pub line_active: Option<(NameOrNum, i32)>,
    pub line_inactive: Option<(NameOrNum, i32)>,
    pub color: Option<i32>,
    pub activator_type: Option<i32>,
    pub mobj_gone: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TickerDef {
    pub start: f32,
    pub end: f32,
    pub interval: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialMoveDef {
    /// Degrees
    pub angle: f32,
    pub speed: f32,
}

fn unlimited() -> i32 {
    -1
}

fn never() -> f32 {
    -1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineTypeDef {
    pub id: i32,
    pub class: NameOrNum,
    #[serde(default)]
    pub act_type: Option<NameOrNum>,
    #[serde(default = "unlimited")]
    pub count: i32,
    /// Seconds
    #[serde(default = "never")]
    pub time: f32,
    #[serde(default)]
    pub act_tag: i32,
    /// Trigger grid names such as `player_use_a`
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Names from either of the other two flag sets
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub gates: GatesDef,
    #[serde(default)]
    pub ticker: TickerDef,
    #[serde(default)]
    pub ev_chain: i32,
    #[serde(default)]
    pub act: SideEffectsDef,
    #[serde(default)]
    pub deact: SideEffectsDef,
    #[serde(default)]
    pub wall_section: Option<NameOrNum>,
    #[serde(default)]
    pub material_move: MaterialMoveDef,
    #[serde(default)]
    pub params: BTreeMap<String, ParmValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DefsFile {
    #[serde(rename = "line_type", default)]
    pub line_types: Vec<LineTypeDef>,
}

impl DefsFile {
    pub fn parse(text: &str) -> Result<Self, XgError> {
        Ok(toml::from_str(text)?)
    }
}

fn parse_flag_names<T: Copy>(text: &str, names: &[(&str, T)], to_bits: impl Fn(T) -> u32) -> Result<u32, String> {
    text.split('|')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .try_fold(0, |bits, name| {
            names
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, f)| bits | to_bits(*f))
                .ok_or_else(|| format!("unknown flag {name}"))
        })
}

fn name_or_num(value: &NameOrNum, lookup: impl Fn(&str) -> Option<i32>) -> Result<i32, String> {
    match value {
        NameOrNum::Num(n) => i32::try_from(*n).map_err(|_| format!("{n} is out of range")),
        NameOrNum::Name(name) => lookup(name).ok_or_else(|| format!("unknown name {name}")),
    }
}

fn int_value(hint: ParmHint, value: &ParmValue) -> Result<i32, String> {
    match (value, hint) {
        (ParmValue::Int(n), _) => i32::try_from(*n).map_err(|_| format!("{n} is out of range")),
        (ParmValue::Text(s), ParmHint::LineRef) => {
            LineRef::from_name(s).map(|r| r as i32).ok_or_else(|| format!("unknown line reference {s}"))
        }
        (ParmValue::Text(s), ParmHint::PlaneRef) => {
            PlaneRef::from_name(s).map(|r| r as i32).ok_or_else(|| format!("unknown plane reference {s}"))
        }
        (ParmValue::Text(s), ParmHint::LineDataRef) => LineDataRef::from_name(s)
            .map(|r| r as i32)
            .ok_or_else(|| format!("unknown line data reference {s}")),
        (ParmValue::Text(s), ParmHint::Flags(names)) => parse_flag_names(s, names, |f| f).map(|b| b as i32),
        (other, _) => Err(format!("expected a number, found {other:?}")),
    }
}

fn float_value(value: &ParmValue) -> Result<f32, String> {
    match value {
        ParmValue::Float(f) => Ok(*f as f32),
        ParmValue::Int(n) => Ok(*n as f32),
        other => Err(format!("expected a number, found {other:?}")),
    }
}

fn list(value: &ParmValue, count: usize) -> Result<&[ParmValue], String> {
    match value {
        ParmValue::List(items) if items.len() <= count => Ok(items),
        ParmValue::List(items) => Err(format!("{} values given, at most {count} allowed", items.len())),
        other => Err(format!("expected a list, found {other:?}")),
    }
}

fn apply_param(raw: &mut RawLineType, schema: &ParmSchema, value: &ParmValue) -> Result<(), String> {
    match schema.slot {
        Slot::Int(i) => raw.iparm[i] = int_value(schema.hint, value)?,
        Slot::Float(i) => raw.fparm[i] = float_value(value)?,
        Slot::Str(i) => match value {
            ParmValue::Text(s) => raw.sparm[i] = s.clone(),
            other => return Err(format!("expected text, found {other:?}")),
        },
        Slot::IntRange(first, count) => {
            for (n, item) in list(value, count)?.iter().enumerate() {
                raw.iparm[first + n] = int_value(schema.hint, item)?;
            }
        }
        Slot::FloatRange(first, count) => {
            for (n, item) in list(value, count)?.iter().enumerate() {
                raw.fparm[first + n] = float_value(item)?;
            }
        }
    }
    Ok(())
}

impl LineTypeDef {
    pub fn to_raw(&self) -> Result<RawLineType, XgError> {
        let id = self.id;
        let err = |m: String| XgError::Parse(format!("line type {id}: {m}"));

        let class = name_or_num(&self.class, |n| ClassId::from_name(n).map(|c| c as i32))
            .and_then(|n| {
                u8::try_from(n)
                    .ok()
                    .and_then(ClassId::from_u8)
                    .ok_or_else(|| format!("no class {n}"))
            })
            .map_err(err)?;
        let act_type = match &self.act_type {
            Some(a) => name_or_num(a, |n| ActType::from_name(n).map(|a| a as i32))
                .and_then(|n| {
                    u8::try_from(n)
                        .ok()
                        .and_then(ActType::from_u8)
                        .ok_or_else(|| format!("no activation type {n}"))
                })
                .map_err(err)?,
            None => ActType::Always,
        };
        let wall_section = match &self.wall_section {
            Some(w) => name_or_num(w, |n| match n {
                "top" => Some(SectionKind::Top),
                "middle" => Some(SectionKind::Middle),
                "bottom" => Some(SectionKind::Bottom),
                _ => None,
            }
            .map(|k| k as i32 + 1))
            .map_err(err)?,
            None => 0,
        };

        let mut raw = RawLineType {
            id,
            line_class: class as u8,
            act_type: act_type as u8,
            act_count: self.count,
            act_time: self.time,
            act_tag: self.act_tag,
            ticker_start: self.ticker.start,
            ticker_end: self.ticker.end,
            ticker_interval: self.ticker.interval,
            act_sound: self.act.sound,
            deact_sound: self.deact.sound,
            ev_chain: self.ev_chain,
            act_chain: self.act.chain,
            deact_chain: self.deact.chain,
            act_line_type: self.act.line_type,
            deact_line_type: self.deact.line_type,
            wall_section,
            act_material: self.act.material,
            deact_material: self.deact.material,
            act_msg: self.act.msg.clone(),
            deact_msg: self.deact.msg.clone(),
            material_move_angle: self.material_move.angle,
            material_move_speed: self.material_move.speed,
            ..RawLineType::default()
        };

        for name in self.triggers.iter() {
            raw.flags |= trigger_flag_from_name(name).ok_or_else(|| err(format!("unknown trigger {name}")))?;
        }
        for name in self.flags.iter() {
            if let Ok(bits) = parse_flag_names(name, FLAGS2_NAMES, |f| f as u32) {
                raw.flags2 |= bits;
            } else {
                raw.flags3 |= parse_flag_names(name, FLAGS3_NAMES, |f| f as u32).map_err(err)?;
            }
        }
        self.apply_gates(&mut raw).map_err(err)?;

        let schema = class.info();
        for (name, value) in self.params.iter() {
            let parm = schema
                .param(name)
                .ok_or_else(|| err(format!("class {} has no parameter {name}", schema.name)))?;
            apply_param(&mut raw, parm, value).map_err(|e| err(format!("{name}: {e}")))?;
        }
        Ok(raw)
    }

    fn apply_gates(&self, raw: &mut RawLineType) -> Result<(), String> {
        let g = &self.gates;
        let line_ref = |r: &NameOrNum| name_or_num(r, |n| LineRef::from_name(n).map(|r| r as i32));
        let mut gate = |flag: LineTypeFlags2, slot: usize, value: Option<i32>| {
            if let Some(v) = value {
                raw.flags2 |= flag as u32;
                raw.aparm[slot] = v;
            }
        };

        gate(LineTypeFlags2::HealthAbove, 0, g.health_above);
        gate(LineTypeFlags2::HealthBelow, 1, g.health_below);
        gate(LineTypeFlags2::PowerAbove, 2, g.power_above);
        gate(LineTypeFlags2::PowerBelow, 3, g.power_below);
        gate(LineTypeFlags2::Color, 8, g.color);
        gate(LineTypeFlags2::ActivatorType, 9, g.activator_type);
        gate(LineTypeFlags2::MobjGone, 9, g.mobj_gone);
        if let Some((kind, datum)) = &g.line_active {
            gate(LineTypeFlags2::LineActive, 4, Some(line_ref(kind)?));
            gate(LineTypeFlags2::LineActive, 5, Some(*datum));
        }
        if let Some((kind, datum)) = &g.line_inactive {
            gate(LineTypeFlags2::LineInactive, 6, Some(line_ref(kind)?));
            gate(LineTypeFlags2::LineInactive, 7, Some(*datum));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::DefsFile;
    use crate::xg::class::ClassId;
    use crate::xg::line_type::{ActType, LineType, LineTypeFlags2, LineTypeFlags3};
    use crate::xg::params::ClassParams;

    const DEFS: &str = r#"
        [[line_type]]
        id = 1200
        class = "key"
        act_type = "counted_off"
        count = 1
        triggers = ["player_use_a"]
        flags = ["when_activated", "key1|skill3"]
        gates = { health_above = 10, line_active = ["tagged", 7] }
        act = { sound = 23, msg = "Got it" }
        wall_section = "middle"
        params = { give = "red_card|blue_skull" }

        [[line_type]]
        id = 1300
        class = 1
        params = { flags = "loop", types = [1200, 1201], intervals = [1, 0.5] }
    "#;

    #[test]
    fn text_definitions() {
        let file = DefsFile::parse(DEFS).unwrap();
        assert_eq!(file.line_types.len(), 2);

        let raw = file.line_types[0].to_raw().unwrap();
        assert_eq!(raw.act_count, 1);
        assert_eq!(raw.act_time, -1.0);
        assert_eq!(raw.flags, 1);
        assert_eq!(raw.wall_section, 2);
        assert_eq!(raw.iparm[0], 0b1100);
        let info = LineType::from_raw(&raw).unwrap();
        assert_eq!(info.class, ClassId::Key);
        assert_eq!(info.act_type, ActType::CountedOff);
        assert!(info.has_flag2(LineTypeFlags2::WhenActivated));
        assert!(info.has_flag2(LineTypeFlags2::HealthAbove));
        assert!(info.has_flag2(LineTypeFlags2::LineActive));
        assert!(info.has_flag3(LineTypeFlags3::Skill3));
        assert_eq!(info.keys(), 1);
        assert_eq!(info.gates.line_active, (2, 7));
        assert_eq!(info.act_sound, 23);
        assert_eq!(info.act_msg, "Got it");

        let raw = file.line_types[1].to_raw().unwrap();
        let info = LineType::from_raw(&raw).unwrap();
        let ClassParams::ChainSequence(p) = info.params else {
            panic!("not a chain sequence");
        };
        assert_eq!(p.step(2).map(|s| s.line_type), Some(1201));
        assert_eq!(p.interval(1), 1.0);
        assert_eq!(p.interval(2), 0.5);
    }

    #[test]
    fn bad_definitions() {
        let unknown_param = r#"
            [[line_type]]
            id = 5
            class = "damage"
            params = { teleport = 3 }
        "#;
        let file = DefsFile::parse(unknown_param).unwrap();
        assert!(file.line_types[0].to_raw().is_err());

        let unknown_class = r#"
            [[line_type]]
            id = 6
            class = "fly"
        "#;
        let file = DefsFile::parse(unknown_class).unwrap();
        assert!(file.line_types[0].to_raw().is_err());

        assert!(DefsFile::parse("[[line_type]]\nid = 7\nclass = 2\ncolour = 1\n").is_err());
    }
}
