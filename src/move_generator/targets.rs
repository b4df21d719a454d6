use once_cell::sync::Lazy;

use crate::bitboard::{Bitboard, Square};
use crate::board::color::Color;
use crate::board::piece::Piece;

use super::ray_table::{Direction, RayTable, BISHOP_DIRS, ROOK_DIRS};

static TABLES: Lazy<Targets> = Lazy::new(Targets::new);

/// Precomputed movement tables shared by attack-map construction and move
/// generation: leaper tables for knights and kings, rays for sliders.
struct Targets {
    knights: [Bitboard; 64],
    kings: [Bitboard; 64],
    rays: RayTable,
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

impl Targets {
    fn new() -> Self {
        Self {
            knights: generate_leaper_table(&KNIGHT_OFFSETS),
            kings: generate_leaper_table(&KING_OFFSETS),
            rays: RayTable::new(),
        }
    }
}

fn generate_leaper_table(offsets: &[(i8, i8); 8]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];

    for (square_index, entry) in table.iter_mut().enumerate() {
        let square = Square::new(square_index as u8);
        let mut targets = Bitboard::EMPTY;

        for &(file_delta, rank_delta) in offsets {
            let file = square.file() as i8 + file_delta;
            let rank = square.rank() as i8 + rank_delta;
            if (0..8).contains(&file) && (0..8).contains(&rank) {
                targets |= Square::from_file_rank(file as u8, rank as u8).to_bitboard();
            }
        }

        *entry = targets;
    }

    table
}

/// The 8 (or fewer, at edges) knight destinations from a square, regardless
/// of occupancy.
pub fn knight_targets(square: Square) -> Bitboard {
    TABLES.knights[square.index()]
}

/// The adjacent squares of a king, regardless of occupancy.
pub fn king_targets(square: Square) -> Bitboard {
    TABLES.kings[square.index()]
}

/// Sliding-piece targets from a square. Travel stops at the first occupied
/// square in each direction, inclusive of that square; callers mask off
/// friendly occupants when generating moves rather than attacks.
pub fn sliding_targets(square: Square, piece: Piece, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Rook => ray_targets(square, &ROOK_DIRS, occupied),
        Piece::Bishop => ray_targets(square, &BISHOP_DIRS, occupied),
        Piece::Queen => {
            ray_targets(square, &ROOK_DIRS, occupied) | ray_targets(square, &BISHOP_DIRS, occupied)
        }
        _ => Bitboard::EMPTY,
    }
}

fn ray_targets(square: Square, dirs: &[Direction; 4], occupied: Bitboard) -> Bitboard {
    let mut targets = Bitboard::EMPTY;

    for &dir in dirs {
        let ray = TABLES.rays.get(square, dir);
        let blockers = ray & occupied;

        if blockers.is_empty() {
            targets |= ray;
            continue;
        }

        // the nearest blocker terminates the ray; everything beyond it,
        // found by following the same ray from the blocker, is unreachable
        let nearest = if dir.is_ascending() {
            blockers.lsb()
        } else {
            blockers.msb()
        };
        targets |= ray ^ TABLES.rays.get(nearest, dir);
    }

    targets
}

/// Every square attacked by the given pawns: diagonal capture squares only,
/// no forward pushes. Wrap-around at the board edge is masked off.
pub fn pawn_attacks(pawns: Bitboard, color: Color) -> Bitboard {
    let (west_attacks, east_attacks) = match color {
        Color::White => (
            (pawns << 7) & !Bitboard::H_FILE,
            (pawns << 9) & !Bitboard::A_FILE,
        ),
        Color::Black => (
            (pawns >> 9) & !Bitboard::H_FILE,
            (pawns >> 7) & !Bitboard::A_FILE,
        ),
    };
    west_attacks | east_attacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::square::*;

    #[test]
    fn test_knight_targets_center() {
        let expected = Bitboard::EMPTY
            | D5.to_bitboard()
            | F5.to_bitboard()
            | C4.to_bitboard()
            | G4.to_bitboard()
            | C2.to_bitboard()
            | G2.to_bitboard()
            | D1.to_bitboard()
            | F1.to_bitboard();
        assert_eq!(expected, knight_targets(E3));
    }

    #[test]
    fn test_knight_targets_corner() {
        let expected = B3.to_bitboard() | C2.to_bitboard();
        assert_eq!(expected, knight_targets(A1));
    }

    #[test]
    fn test_king_targets_corner() {
        let expected = G7.to_bitboard() | H7.to_bitboard() | G8.to_bitboard();
        assert_eq!(expected, king_targets(H8));
    }

    #[test]
    fn test_sliding_targets_stop_at_first_blocker_inclusive() {
        let occupied = C4.to_bitboard() | E7.to_bitboard();
        let targets = sliding_targets(E4, Piece::Rook, occupied);

        // west: d4 then the blocker on c4, but not b4
        assert!(targets.overlaps(D4.to_bitboard()));
        assert!(targets.overlaps(C4.to_bitboard()));
        assert!(!targets.overlaps(B4.to_bitboard()));

        // north: up to and including the blocker on e7
        assert!(targets.overlaps(E5.to_bitboard() | E6.to_bitboard() | E7.to_bitboard()));
        assert!(!targets.overlaps(E8.to_bitboard()));

        // east and south run to the board edge
        assert!(targets.overlaps(H4.to_bitboard()));
        assert!(targets.overlaps(E1.to_bitboard()));
    }

    #[test]
    fn test_queen_targets_combine_rook_and_bishop_rays() {
        let occupied = Bitboard::EMPTY;
        assert_eq!(
            sliding_targets(D4, Piece::Rook, occupied) | sliding_targets(D4, Piece::Bishop, occupied),
            sliding_targets(D4, Piece::Queen, occupied)
        );
    }

    #[test]
    fn test_pawn_attacks_mask_edge_wrap() {
        // a white pawn on a4 attacks only b5
        assert_eq!(
            B5.to_bitboard(),
            pawn_attacks(A4.to_bitboard(), Color::White)
        );
        // a black pawn on h5 attacks only g4
        assert_eq!(
            G4.to_bitboard(),
            pawn_attacks(H5.to_bitboard(), Color::Black)
        );
        // a white pawn on e4 attacks d5 and f5
        assert_eq!(
            D5.to_bitboard() | F5.to_bitboard(),
            pawn_attacks(E4.to_bitboard(), Color::White)
        );
    }
}
