use crate::doom_def::Card;

pub const PD_BLUEO: &str = "You need a blue key to activate this object";
pub const PD_REDO: &str = "You need a red key to activate this object";
pub const PD_YELLOWO: &str = "You need a yellow key to activate this object";
pub const PD_BLUESO: &str = "You need a blue skull key to activate this object";
pub const PD_REDSO: &str = "You need a red skull key to activate this object";
pub const PD_YELLOWSO: &str = "You need a yellow skull key to activate this object";

/// Message shown to a player who tried a line without this key
pub fn key_needed(card: Card) -> &'static str {
    match card {
        Card::Bluecard => PD_BLUEO,
        Card::Yellowcard => PD_YELLOWO,
        Card::Redcard => PD_REDO,
        Card::Blueskull => PD_BLUESO,
        Card::Yellowskull => PD_YELLOWSO,
        Card::Redskull | Card::NumCards => PD_REDSO,
    }
}
