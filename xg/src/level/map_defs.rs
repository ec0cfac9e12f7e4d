use glam::Vec2;
use math::Angle;

/// The SECTORS record, at runtime.
#[derive(Debug, Default, Clone)]
pub struct Sector {
    /// An incremented "ID" of sorts.
    pub num: u32,
    pub floorheight: f32,
    pub ceilingheight: f32,
    /// Material id, 0 for none
    pub floorpic: usize,
    /// Material id, 0 for none
    pub ceilingpic: usize,
    pub lightlevel: usize,
    pub special: i16,
    pub tag: i16,
    /// Group id used by act-tagged plane references
    pub act_tag: i32,
    /// origin for any sounds played by the sector
    pub sound_origin: Vec2,
    /// Owner of sounds played from `sound_origin`. Never a thing index.
    pub sound_uid: usize,
    /// Indexes of the lines bordering this sector, filled by `MapData::load`
    pub lines: Vec<usize>,
    /// Indexes in to `Level::things` of the things standing in this sector
    pub thinglist: Vec<usize>,
}

impl Sector {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num: u32,
        floorheight: f32,
        ceilingheight: f32,
        floorpic: usize,
        ceilingpic: usize,
        lightlevel: usize,
        special: i16,
        tag: i16,
    ) -> Self {
        Self {
            num,
            floorheight,
            ceilingheight,
            floorpic,
            ceilingpic,
            lightlevel,
            special,
            tag,
            ..Self::default()
        }
    }
}

/// One of the three wall parts of a side
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Top,
    Middle,
    Bottom,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [SectionKind::Top, SectionKind::Middle, SectionKind::Bottom];

    /// Wall section numbering used by line types: 1 top, 2 middle, 3 bottom
    pub fn from_i32(n: i32) -> Option<Self> {
        match n {
            1 => Some(SectionKind::Top),
            2 => Some(SectionKind::Middle),
            3 => Some(SectionKind::Bottom),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SideSection {
    pub material: Option<usize>,
    /// Added to the calculated texture column and row
    pub offset: Vec2,
    /// RGBA tint, each component 0.0..=1.0
    pub color: [f32; 4],
}

impl Default for SideSection {
    fn default() -> Self {
        Self {
            material: None,
            offset: Vec2::ZERO,
            color: [1.0; 4],
        }
    }
}

impl SideSection {
    pub fn with_material(material: usize) -> Self {
        Self {
            material: Some(material),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct SideDef {
    /// Sector the SideDef is facing.
    pub sector: usize,
    pub top: SideSection,
    pub middle: SideSection,
    pub bottom: SideSection,
    /// Blend mode of the middle section
    pub blend_mode: i32,
    pub flags: u32,
}

impl SideDef {
    pub fn new(sector: usize, top: Option<usize>, middle: Option<usize>, bottom: Option<usize>) -> Self {
        Self {
            sector,
            top: SideSection {
                material: top,
                ..SideSection::default()
            },
            middle: SideSection {
                material: middle,
                ..SideSection::default()
            },
            bottom: SideSection {
                material: bottom,
                ..SideSection::default()
            },
            ..Self::default()
        }
    }

    pub fn section(&self, kind: SectionKind) -> &SideSection {
        match kind {
            SectionKind::Top => &self.top,
            SectionKind::Middle => &self.middle,
            SectionKind::Bottom => &self.bottom,
        }
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut SideSection {
        match kind {
            SectionKind::Top => &mut self.top,
            SectionKind::Middle => &mut self.middle,
            SectionKind::Bottom => &mut self.bottom,
        }
    }
}

#[derive(Clone)]
pub struct LineDef {
    // Vertices, from v1 to v2.
    pub v1: Vec2,
    pub v2: Vec2,
    // Precalculated v2 - v1 for side checking.
    pub delta: Vec2,
    pub flags: u32,
    pub special: i16,
    pub tag: i16,
    pub front_sidedef: usize,
    pub back_sidedef: Option<usize>,
    // Front and back sector, set from the sidedefs when the map is loaded
    pub frontsector: usize,
    pub backsector: Option<usize>,
}

impl std::fmt::Debug for LineDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linedef")
            .field("v1", &self.v1)
            .field("v2", &self.v2)
            .field("flags", &self.flags)
            .field("special", &self.special)
            .field("tag", &self.tag)
            .field("front_sidedef", &self.front_sidedef)
            .field("back_sidedef", &self.back_sidedef)
            .finish_non_exhaustive()
    }
}

impl LineDef {
    pub fn new(
        v1: Vec2,
        v2: Vec2,
        flags: u32,
        special: i16,
        tag: i16,
        front_sidedef: usize,
        back_sidedef: Option<usize>,
    ) -> Self {
        Self {
            v1,
            v2,
            delta: v2 - v1,
            flags,
            special,
            tag,
            front_sidedef,
            back_sidedef,
            frontsector: 0,
            backsector: None,
        }
    }

    /// 0 for the front (right hand) side, 1 for the back
    pub fn point_on_side(&self, v: Vec2) -> usize {
        let dx = v.x - self.v1.x;
        let dy = v.y - self.v1.y;

        if (dy * self.delta.x) <= (self.delta.y * dx) {
            // Front side
            return 0;
        }
        // Backside
        1
    }

    pub fn length(&self) -> f32 {
        self.delta.length()
    }

    /// Direction of travel from v1 to v2
    pub fn angle(&self) -> Angle {
        Angle::from_vector(self.delta)
    }

    pub fn sidedef(&self, side: usize) -> Option<usize> {
        if side == 0 {
            Some(self.front_sidedef)
        } else {
            self.back_sidedef
        }
    }

    pub fn sector(&self, side: usize) -> Option<usize> {
        if side == 0 {
            Some(self.frontsector)
        } else {
            self.backsector
        }
    }
}
