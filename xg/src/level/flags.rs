/// The flags control some attributes of the line
pub enum LineDefFlags {
    /// Players and monsters cannot cross this line. Note that
    /// if there is no sector on the other side, they can't go through the line
    /// anyway, regardless of the flags
    Blocking = 1,
    /// Monsters cannot cross this line
    BlockMonsters = 1 << 1,
    /// The linedef's two sidedefs can have "-" as a texture,
    /// which in this case means "transparent".
    TwoSided = 1 << 2,
    UnpegTop = 1 << 3,
    UnpegBottom = 1 << 4,
    /// On the automap this line appears as a solid wall. Monsters and other
    /// non-players may not use it.
    Secret = 1 << 5,
    /// Sound rendering: this line blocks sound
    SoundBlock = 1 << 6,
    /// The line is never drawn on the automap
    DontDraw = 1 << 7,
    /// The line is always drawn on the automap
    Draw = 1 << 8,
}
