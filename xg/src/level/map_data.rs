use std::collections::HashMap;

use glam::Vec2;
use log::{info, warn};

use crate::XgError;
use crate::level::map_defs::{LineDef, Sector, SideDef};

/// Set on the sound owner id of every sector so it can't match a thing index
pub const SECTOR_SOUND_UID: usize = 1 << (usize::BITS - 1);

/// Everything the line engine needs of a loaded map: lines, sides, sectors,
/// and the tag lookups built once at load.
///
/// The line and sector arrays are never resized after `load()` as the XG
/// state and tag indexes refer to elements by index.
#[derive(Debug, Default)]
pub struct MapData {
    name: String,
    linedefs: Vec<LineDef>,
    sidedefs: Vec<SideDef>,
    sectors: Vec<Sector>,
    /// Line indexes grouped by tag, each group in index order
    line_tags: HashMap<i16, Vec<usize>>,
    /// Sector indexes grouped by tag, each group in index order
    sector_tags: HashMap<i16, Vec<usize>>,
}

impl MapData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn linedefs(&self) -> &[LineDef] {
        &self.linedefs
    }

    pub fn linedefs_mut(&mut self) -> &mut [LineDef] {
        &mut self.linedefs
    }

    pub fn sidedefs(&self) -> &[SideDef] {
        &self.sidedefs
    }

    pub fn sidedefs_mut(&mut self) -> &mut [SideDef] {
        &mut self.sidedefs
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sectors_mut(&mut self) -> &mut [Sector] {
        &mut self.sectors
    }

    /// Link lines to their sides and sectors, then build the tag indexes.
    /// Fails if any line or side points outside the arrays given.
    pub fn load(
        &mut self,
        linedefs: Vec<LineDef>,
        sidedefs: Vec<SideDef>,
        sectors: Vec<Sector>,
    ) -> Result<(), XgError> {
        self.linedefs = linedefs;
        self.sidedefs = sidedefs;
        self.sectors = sectors;

        for side in self.sidedefs.iter() {
            if side.sector >= self.sectors.len() {
                return Err(XgError::Parse(format!(
                    "{}: sidedef faces missing sector {}",
                    self.name, side.sector
                )));
            }
        }

        for (i, line) in self.linedefs.iter_mut().enumerate() {
            let front = self.sidedefs.get(line.front_sidedef).ok_or_else(|| {
                XgError::Parse(format!("{}: line {i} has no front sidedef", self.name))
            })?;
            line.frontsector = front.sector;
            line.backsector = match line.back_sidedef {
                Some(back) => Some(
                    self.sidedefs
                        .get(back)
                        .ok_or_else(|| {
                            XgError::Parse(format!("{}: line {i} has a missing back sidedef", self.name))
                        })?
                        .sector,
                ),
                None => None,
            };
            line.delta = line.v2 - line.v1;
        }

        for sector in self.sectors.iter_mut() {
            sector.lines.clear();
        }
        for (i, line) in self.linedefs.iter().enumerate() {
            self.sectors[line.frontsector].lines.push(i);
            if let Some(back) = line.backsector {
                if back != line.frontsector {
                    self.sectors[back].lines.push(i);
                }
            }
        }
        for i in 0..self.sectors.len() {
            self.sectors[i].sound_uid = SECTOR_SOUND_UID | i;
            self.set_sector_sound_origin(i);
        }

        self.build_tag_indexes();
        info!(
            "{}: Loaded {} lines, {} sides, {} sectors",
            self.name,
            self.linedefs.len(),
            self.sidedefs.len(),
            self.sectors.len()
        );
        Ok(())
    }

    fn build_tag_indexes(&mut self) {
        self.line_tags.clear();
        self.sector_tags.clear();
        for (i, line) in self.linedefs.iter().enumerate() {
            self.line_tags.entry(line.tag).or_default().push(i);
        }
        for (i, sector) in self.sectors.iter().enumerate() {
            self.sector_tags.entry(sector.tag).or_default().push(i);
        }
    }

    /// All lines with this tag, in index order
    pub fn lines_for_tag(&self, tag: i16) -> &[usize] {
        self.line_tags.get(&tag).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All sectors with this tag, in index order
    pub fn sectors_for_tag(&self, tag: i16) -> &[usize] {
        self.sector_tags.get(&tag).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The centre of the bounding box of the sector's lines
    fn set_sector_sound_origin(&mut self, sector: usize) {
        let Some(&first) = self.sectors[sector].lines.first() else {
            warn!("{}: sector {sector} has no lines", self.name);
            return;
        };
        let mut min = self.linedefs[first].v1;
        let mut max = self.linedefs[first].v1;
        for &line in self.sectors[sector].lines.iter() {
            let line = &self.linedefs[line];
            min = min.min(line.v1).min(line.v2);
            max = max.max(line.v1).max(line.v2);
        }
        self.sectors[sector].sound_origin = Vec2::new(min.x + (max.x - min.x) / 2.0, min.y + (max.y - min.y) / 2.0);
    }
}
