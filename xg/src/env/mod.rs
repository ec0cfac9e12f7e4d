pub mod switch;
pub mod teleport;
