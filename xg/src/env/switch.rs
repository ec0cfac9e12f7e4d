//! Switch graphics and sector sounds for lines changing state

use log::debug;

use crate::Level;
use crate::level::map_defs::SectionKind;

/// Start a sound using the sector's sound origin
pub(crate) fn start_sector_sound(level: &Level, sector: usize, sfx: i32) {
    let Some(sec) = level.map_data.sectors().get(sector) else {
        debug!("No sector {sector} to play sound {sfx} in");
        return;
    };
    let origin = sec.sound_origin;
    level.start_sound(sec.sound_uid, sfx, origin.x, origin.y);
}

/// Doom function name `P_ChangeSwitchTexture`
///
/// Swap the first front side section showing a switch material for its
/// partner in `switch_list`. Returns false if the line shows no switch.
pub fn change_switch_texture(level: &mut Level, line: usize) -> bool {
    let Some(side) = level.map_data.linedefs().get(line).map(|l| l.front_sidedef) else {
        return false;
    };
    let switch_list = &level.switch_list;
    let Some(side) = level.map_data.sidedefs_mut().get_mut(side) else {
        return false;
    };

    for i in 0..switch_list.len() {
        let sw = switch_list[i];
        for kind in SectionKind::ALL {
            let section = side.section_mut(kind);
            if section.material == Some(sw) {
                if let Some(&other) = switch_list.get(i ^ 1) {
                    section.material = Some(other);
                    return true;
                }
            }
        }
    }
    false
}
