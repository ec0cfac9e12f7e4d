//! Reference evaluation: turning a (kind, datum) pair in to the lines or
//! planes it names, or in to a value read off a line.
//!
//! Unknown kinds never fail, they name nothing (or the value 0).

use log::debug;

use crate::Level;
use crate::level::map_defs::SectionKind;
use crate::xg::LineCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRef {
    None = 0,
    SelfRef = 1,
    Tagged = 2,
    /// Lines sharing the origin's tag, datum set excludes the origin
    LineTagged = 3,
    ActTagged = 4,
    Index = 5,
    All = 6,
}

const LINE_REF_NAMES: &[(&str, LineRef)] = &[
    ("none", LineRef::None),
    ("self", LineRef::SelfRef),
    ("tagged", LineRef::Tagged),
    ("line_tagged", LineRef::LineTagged),
    ("act_tagged", LineRef::ActTagged),
    ("index", LineRef::Index),
    ("all", LineRef::All),
];

impl LineRef {
    pub fn from_i32(n: i32) -> Option<Self> {
        LINE_REF_NAMES.iter().map(|(_, r)| *r).find(|r| *r as i32 == n)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        LINE_REF_NAMES.iter().find(|(n, _)| *n == name).map(|(_, r)| *r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneRef {
    None = 0,
    MyFloor = 1,
    TaggedFloors = 2,
    LineTaggedFloors = 3,
    ActTaggedFloors = 4,
    IndexFloor = 5,
    AllFloors = 6,
    MyCeiling = 7,
    TaggedCeilings = 8,
    LineTaggedCeilings = 9,
    ActTaggedCeilings = 10,
    IndexCeiling = 11,
    AllCeilings = 12,
    /// Sectors whose special equals the datum
    Special = 13,
    BackFloor = 14,
    BackCeiling = 15,
    /// Sectors holding at least one thing of the datum's type
    ThingExistFloors = 16,
    ThingExistCeilings = 17,
    /// Sectors holding no thing of the datum's type
    ThingNoExistFloors = 18,
    ThingNoExistCeilings = 19,
}

const PLANE_REF_NAMES: &[(&str, PlaneRef)] = &[
    ("none", PlaneRef::None),
    ("my_floor", PlaneRef::MyFloor),
    ("tagged_floors", PlaneRef::TaggedFloors),
    ("line_tagged_floors", PlaneRef::LineTaggedFloors),
    ("act_tagged_floors", PlaneRef::ActTaggedFloors),
    ("index_floor", PlaneRef::IndexFloor),
    ("all_floors", PlaneRef::AllFloors),
    ("my_ceiling", PlaneRef::MyCeiling),
    ("tagged_ceilings", PlaneRef::TaggedCeilings),
    ("line_tagged_ceilings", PlaneRef::LineTaggedCeilings),
    ("act_tagged_ceilings", PlaneRef::ActTaggedCeilings),
    ("index_ceiling", PlaneRef::IndexCeiling),
    ("all_ceilings", PlaneRef::AllCeilings),
    ("special", PlaneRef::Special),
    ("back_floor", PlaneRef::BackFloor),
    ("back_ceiling", PlaneRef::BackCeiling),
    ("thing_exist_floors", PlaneRef::ThingExistFloors),
    ("thing_exist_ceilings", PlaneRef::ThingExistCeilings),
    ("thing_no_exist_floors", PlaneRef::ThingNoExistFloors),
    ("thing_no_exist_ceilings", PlaneRef::ThingNoExistCeilings),
];

impl PlaneRef {
    pub fn from_i32(n: i32) -> Option<Self> {
        PLANE_REF_NAMES.iter().map(|(_, r)| *r).find(|r| *r as i32 == n)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PLANE_REF_NAMES.iter().find(|(n, _)| *n == name).map(|(_, r)| *r)
    }

    pub fn is_ceiling(self) -> bool {
        matches!(
            self,
            PlaneRef::MyCeiling
                | PlaneRef::TaggedCeilings
                | PlaneRef::LineTaggedCeilings
                | PlaneRef::ActTaggedCeilings
                | PlaneRef::IndexCeiling
                | PlaneRef::AllCeilings
                | PlaneRef::BackCeiling
                | PlaneRef::ThingExistCeilings
                | PlaneRef::ThingNoExistCeilings
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDataRef {
    None = 0,
    Id = 1,
    Special = 2,
    Tag = 3,
    ActTag = 4,
    Count = 5,
    /// Degrees, 0..360
    Angle = 6,
    Length = 7,
    TopOffsetX = 8,
    TopOffsetY = 9,
    MiddleOffsetX = 10,
    MiddleOffsetY = 11,
    BottomOffsetX = 12,
    BottomOffsetY = 13,
}

const LINE_DATA_REF_NAMES: &[(&str, LineDataRef)] = &[
    ("none", LineDataRef::None),
    ("id", LineDataRef::Id),
    ("special", LineDataRef::Special),
    ("tag", LineDataRef::Tag),
    ("act_tag", LineDataRef::ActTag),
    ("count", LineDataRef::Count),
    ("angle", LineDataRef::Angle),
    ("length", LineDataRef::Length),
    ("top_offset_x", LineDataRef::TopOffsetX),
    ("top_offset_y", LineDataRef::TopOffsetY),
    ("middle_offset_x", LineDataRef::MiddleOffsetX),
    ("middle_offset_y", LineDataRef::MiddleOffsetY),
    ("bottom_offset_x", LineDataRef::BottomOffsetX),
    ("bottom_offset_y", LineDataRef::BottomOffsetY),
];

impl LineDataRef {
    pub fn from_i32(n: i32) -> Option<Self> {
        LINE_DATA_REF_NAMES.iter().map(|(_, r)| *r).find(|r| *r as i32 == n)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        LINE_DATA_REF_NAMES.iter().find(|(n, _)| *n == name).map(|(_, r)| *r)
    }
}

/// The lines a reference names, in a stable order. `None` in the list is the
/// single "no line" visit of `LineRef::None`.
pub fn collect_lines(level: &Level, origin: LineCtx, kind: i32, datum: i32) -> Vec<Option<LineCtx>> {
    let Some(kind) = LineRef::from_i32(kind) else {
        debug!("Line {}: invalid line reference kind {kind}", origin.line);
        return Vec::new();
    };
    let lines = level.map_data.linedefs();

    match kind {
        LineRef::None => vec![None],
        LineRef::SelfRef => vec![Some(origin)],
        LineRef::Index => {
            if datum >= 0 && (datum as usize) < lines.len() {
                vec![Some(LineCtx::line(datum as usize))]
            } else {
                debug!("Line {}: no line with index {datum}", origin.line);
                Vec::new()
            }
        }
        LineRef::Tagged => level
            .map_data
            .lines_for_tag(datum as i16)
            .iter()
            .map(|i| Some(LineCtx::line(*i)))
            .collect(),
        LineRef::LineTagged => {
            let Some(tag) = lines.get(origin.line).map(|l| l.tag) else {
                return Vec::new();
            };
            level
                .map_data
                .lines_for_tag(tag)
                .iter()
                .filter(|i| datum == 0 || **i != origin.line)
                .map(|i| Some(LineCtx::line(*i)))
                .collect()
        }
        LineRef::ActTagged => level
            .xg
            .lines
            .iter()
            .enumerate()
            .filter(|(_, xg)| xg.as_ref().is_some_and(|xg| xg.info.act_tag == datum))
            .map(|(i, _)| Some(LineCtx::line(i)))
            .collect(),
        LineRef::All => (0..lines.len()).map(|i| Some(LineCtx::line(i))).collect(),
    }
}

/// Walk the lines named by the reference. Stops the first time `visitor`
/// returns false, and returns false if it did.
pub fn traverse_lines(
    level: &mut Level,
    origin: LineCtx,
    kind: i32,
    datum: i32,
    mut visitor: impl FnMut(&mut Level, Option<LineCtx>) -> bool,
) -> bool {
    for target in collect_lines(level, origin, kind, datum) {
        if !visitor(level, target) {
            return false;
        }
    }
    true
}

fn sector_has_thing(level: &Level, sector: usize, kind: i32) -> bool {
    level.map_data.sectors()[sector]
        .thinglist
        .iter()
        .filter_map(|t| level.things.get(*t))
        .any(|t| !t.removed && t.kind == kind)
}

/// The planes a reference names as (sector, is ceiling), in a stable order.
/// `(None, false)` is the single "no plane" visit of `PlaneRef::None`.
pub fn collect_planes(level: &Level, origin: LineCtx, kind: i32, datum: i32) -> Vec<(Option<usize>, bool)> {
    let Some(kind) = PlaneRef::from_i32(kind) else {
        debug!("Line {}: invalid plane reference kind {kind}", origin.line);
        return Vec::new();
    };
    let ceiling = kind.is_ceiling();
    let sectors = level.map_data.sectors();
    let line = level.map_data.linedefs().get(origin.line);
    let all = 0..sectors.len();

    let found: Vec<usize> = match kind {
        PlaneRef::None => return vec![(None, false)],
        PlaneRef::MyFloor | PlaneRef::MyCeiling => line.map(|l| l.frontsector).into_iter().collect(),
        PlaneRef::BackFloor | PlaneRef::BackCeiling => {
            let back = line.and_then(|l| l.backsector);
            if back.is_none() {
                debug!("Line {}: no back sector", origin.line);
            }
            back.into_iter().collect()
        }
        PlaneRef::TaggedFloors | PlaneRef::TaggedCeilings => level.map_data.sectors_for_tag(datum as i16).to_vec(),
        PlaneRef::LineTaggedFloors | PlaneRef::LineTaggedCeilings => match line {
            Some(l) => level.map_data.sectors_for_tag(l.tag).to_vec(),
            None => Vec::new(),
        },
        PlaneRef::ActTaggedFloors | PlaneRef::ActTaggedCeilings => {
            all.filter(|i| sectors[*i].act_tag == datum).collect()
        }
        PlaneRef::IndexFloor | PlaneRef::IndexCeiling => {
            if datum >= 0 && (datum as usize) < sectors.len() {
                vec![datum as usize]
            } else {
                debug!("Line {}: no sector with index {datum}", origin.line);
                Vec::new()
            }
        }
        PlaneRef::AllFloors | PlaneRef::AllCeilings => all.collect(),
        PlaneRef::Special => all.filter(|i| sectors[*i].special as i32 == datum).collect(),
        PlaneRef::ThingExistFloors | PlaneRef::ThingExistCeilings => {
            all.filter(|i| sector_has_thing(level, *i, datum)).collect()
        }
        PlaneRef::ThingNoExistFloors | PlaneRef::ThingNoExistCeilings => {
            all.filter(|i| !sector_has_thing(level, *i, datum)).collect()
        }
    };
    found.into_iter().map(|s| (Some(s), ceiling)).collect()
}

/// Walk the planes named by the reference. Same stopping rule as
/// `traverse_lines`.
pub fn traverse_planes(
    level: &mut Level,
    origin: LineCtx,
    kind: i32,
    datum: i32,
    mut visitor: impl FnMut(&mut Level, Option<usize>, bool) -> bool,
) -> bool {
    for (sector, ceiling) in collect_planes(level, origin, kind, datum) {
        if !visitor(level, sector, ceiling) {
            return false;
        }
    }
    true
}

/// Read a value off a line. Anything that can't be read is 0.
pub fn validate_line_ref(level: &Level, line: LineCtx, kind: i32, context: &str) -> i32 {
    let Some(kind) = LineDataRef::from_i32(kind) else {
        debug!("Line {}: {context}: invalid line data reference {kind}", line.line);
        return 0;
    };
    let Some(def) = level.map_data.linedefs().get(line.line) else {
        debug!("Line {}: {context}: no such line", line.line);
        return 0;
    };
    let offset = |kind: SectionKind| {
        level
            .map_data
            .sidedefs()
            .get(def.front_sidedef)
            .map(|s| s.section(kind).offset)
            .unwrap_or_default()
    };
    let xg_value = |f: fn(&crate::xg::XgLine) -> i32| match level.xg.get(line) {
        Some(xg) => f(xg),
        None => {
            debug!("Line {}: {context}: line has no XG type", line.line);
            0
        }
    };

    match kind {
        LineDataRef::None => {
            debug!("Line {}: {context}: no line data reference", line.line);
            0
        }
        LineDataRef::Id => line.line as i32,
        LineDataRef::Special => def.special as i32,
        LineDataRef::Tag => def.tag as i32,
        LineDataRef::ActTag => xg_value(|xg| xg.info.act_tag),
        LineDataRef::Count => xg_value(|xg| xg.info.act_count),
        LineDataRef::Angle => def.angle().degrees().round() as i32 % 360,
        LineDataRef::Length => def.length() as i32,
        LineDataRef::TopOffsetX => offset(SectionKind::Top).x as i32,
        LineDataRef::TopOffsetY => offset(SectionKind::Top).y as i32,
        LineDataRef::MiddleOffsetX => offset(SectionKind::Middle).x as i32,
        LineDataRef::MiddleOffsetY => offset(SectionKind::Middle).y as i32,
        LineDataRef::BottomOffsetX => offset(SectionKind::Bottom).x as i32,
        LineDataRef::BottomOffsetY => offset(SectionKind::Bottom).y as i32,
    }
}
