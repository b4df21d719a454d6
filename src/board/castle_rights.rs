use super::color::Color;

/// Castle rights are packed into the four low bits of a byte. A right is
/// revoked permanently once its bit is cleared.
pub type CastleRightsBitmask = u8;

pub const WHITE_KINGSIDE_RIGHTS: CastleRightsBitmask = 0b1000;
pub const WHITE_QUEENSIDE_RIGHTS: CastleRightsBitmask = 0b0100;
pub const BLACK_KINGSIDE_RIGHTS: CastleRightsBitmask = 0b0010;
pub const BLACK_QUEENSIDE_RIGHTS: CastleRightsBitmask = 0b0001;

pub const NO_CASTLE_RIGHTS: CastleRightsBitmask = 0b0000;
pub const ALL_CASTLE_RIGHTS: CastleRightsBitmask = WHITE_KINGSIDE_RIGHTS
    | WHITE_QUEENSIDE_RIGHTS
    | BLACK_KINGSIDE_RIGHTS
    | BLACK_QUEENSIDE_RIGHTS;

pub fn kingside_rights(color: Color) -> CastleRightsBitmask {
    match color {
        Color::White => WHITE_KINGSIDE_RIGHTS,
        Color::Black => BLACK_KINGSIDE_RIGHTS,
    }
}

pub fn queenside_rights(color: Color) -> CastleRightsBitmask {
    match color {
        Color::White => WHITE_QUEENSIDE_RIGHTS,
        Color::Black => BLACK_QUEENSIDE_RIGHTS,
    }
}

pub fn rights_for(color: Color) -> CastleRightsBitmask {
    kingside_rights(color) | queenside_rights(color)
}
