use crate::doom_def::Card;

/// Extended player object info
#[derive(Debug, Default, Clone)]
pub struct Player {
    /// Index of the thing this player drives
    pub mobj: Option<usize>,
    /// Armor points, 0 when none
    pub armorpoints: i32,
    /// Armor type is 0-2.
    pub armortype: i32,
    pub cards: [bool; Card::NumCards as usize],
    /// Hint messages.
    pub message: Option<String>,
}

impl Player {
    pub fn has_card(&self, card: Card) -> bool {
        self.cards.get(card as usize).copied().unwrap_or(false)
    }
}
