/// The maximum number of players, multiplayer/networking.
pub const MAXPLAYERS: usize = 4;

/// Key cards. The order matches the key bits of a line type's third flag set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Card {
    Bluecard,
    Yellowcard,
    Redcard,
    Blueskull,
    Yellowskull,
    Redskull,
    NumCards,
}

impl Card {
    pub const ALL: [Card; 6] = [
        Card::Bluecard,
        Card::Yellowcard,
        Card::Redcard,
        Card::Blueskull,
        Card::Yellowskull,
        Card::Redskull,
    ];
}

/// Armor class given when a line grants armor to a player who has none
pub const DEFAULT_ARMOR_TYPE: i32 = 1;

// Sound id used by the engine itself. Everything else comes from line types.
pub const SFX_OOF: i32 = 34;
