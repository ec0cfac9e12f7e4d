//! Exposes the API the line engine uses to reach the rest of the game: the
//! session rules it gates on, progression when a line ends the map, the
//! console, and the movement primitives it cannot perform on map data alone.

use std::{error::Error, fmt, str::FromStr};

#[derive(Debug)]
pub enum SessionArgError {
    InvalidSkill(String),
}

impl Error for SessionArgError {}

impl fmt::Display for SessionArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionArgError::InvalidSkill(m) => write!(f, "{}", m),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub enum Skill {
    NoItems = -1, // the "-skill 0" hack
    Baby = 0,
    Easy = 1,
    Medium = 2,
    Hard = 3,
    Nightmare = 4,
}

impl Default for Skill {
    fn default() -> Self {
        Skill::Medium
    }
}

impl FromStr for Skill {
    type Err = SessionArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "baby" => Ok(Skill::Baby),
            "1" | "easy" => Ok(Skill::Easy),
            "2" | "medium" => Ok(Skill::Medium),
            "3" | "hard" => Ok(Skill::Hard),
            "4" | "nightmare" => Ok(Skill::Nightmare),
            _ => Err(SessionArgError::InvalidSkill(format!(
                "Invalid skill: {s}"
            ))),
        }
    }
}

/// Where the game should go when a line ends the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitTarget {
    /// Normal progression to whatever follows the current map
    Next,
    /// A specific map id, as produced by `GameTraits::compose_map_id` or
    /// `GameTraits::named_exit_target`
    Map(String),
}

/// Universal game traits. To be implemented by the Game
pub trait GameTraits {
    fn skill(&self) -> Skill;

    fn netgame(&self) -> bool;

    /// 0 for cooperative/single, 1+ for the deathmatch rule in use
    fn deathmatch(&self) -> u8;

    fn episode(&self) -> usize;

    fn map_exists(&self, map_id: &str) -> bool;

    /// Build the game's map identifier for this episode and map number
    fn compose_map_id(&self, episode: usize, map: usize) -> String;

    /// Resolve a named exit such as "secret" to a map id
    fn named_exit_target(&self, name: &str) -> String;

    /// Tell the game that the level is completed and where to go next
    fn leave_map(&mut self, target: ExitTarget);

    /// Run a console command verbatim. Returns false if the command failed.
    fn execute(&mut self, command: &str) -> bool;

    /// Check the teleport destination for the map object at `mobj`. Returns
    /// false if the move is blocked, in which case nothing is moved.
    fn teleport_move(&mut self, mobj: usize, x: f32, y: f32, telefrag: bool) -> bool;

    /// Put a missile into its death state
    fn explode_missile(&mut self, mobj: usize);
}
