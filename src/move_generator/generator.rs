use log::debug;
use smallvec::SmallVec;

use crate::bitboard::{Bitboard, Square};
use crate::board::castle_rights::{kingside_rights, queenside_rights};
use crate::board::color::Color;
use crate::board::piece::Piece;
use crate::board::Position;
use crate::chess_move::Move;

use super::attack_map::{attacked_squares, is_in_check};
use super::targets;

/// Moves are generated into a stack-allocated list; 32 slots covers typical
/// middlegame positions without spilling to the heap.
pub type MoveList = SmallVec<[Move; 32]>;

/// Promotion kinds in generation order.
pub const PAWN_PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

/// All moves for the side to move that obey piece movement rules, without
/// checking whether the mover's king is left in check. Ordering is
/// deterministic: source squares ascending, destinations in ascending square
/// order per source, castles last.
pub fn pseudo_legal_moves(position: &Position) -> MoveList {
    let color = position.turn();
    let mut moves = MoveList::new();

    let mut sources = position.pieces(color).occupied();
    while !sources.is_empty() {
        let from = sources.pop_lsb();
        let (piece, _) = match position.get(from) {
            Some(found) => found,
            None => continue,
        };

        match piece {
            Piece::Pawn => generate_pawn_moves(position, from, color, &mut moves),
            Piece::Knight => {
                generate_targeted_moves(position, from, targets::knight_targets(from), &mut moves)
            }
            Piece::King => {
                generate_targeted_moves(position, from, targets::king_targets(from), &mut moves)
            }
            Piece::Rook | Piece::Bishop | Piece::Queen => generate_targeted_moves(
                position,
                from,
                targets::sliding_targets(from, piece, position.occupied()),
                &mut moves,
            ),
        }
    }

    generate_castle_moves(position, color, &mut moves);

    moves
}

/// The full legal move list for the side to move: pseudo-legal moves filtered
/// by simulating each one and rejecting those that leave the mover's own king
/// attacked. This one filter covers pinned pieces, moving into check, and
/// failing to resolve an existing check.
pub fn legal_moves(position: &Position) -> MoveList {
    pseudo_legal_moves(position)
        .into_iter()
        .filter(|chess_move| match position.apply(chess_move) {
            Ok(next) => !is_in_check(&next, position.turn()),
            Err(_) => false,
        })
        .collect()
}

/// Counts the leaf positions reachable in exactly `depth` plies (perft),
/// for validating generation against known node counts.
pub fn count_positions(position: &Position, depth: u8) -> usize {
    let moves = legal_moves(position);
    if depth <= 1 {
        return moves.len();
    }

    let mut count = 0;
    for chess_move in moves {
        let next = position
            .apply(&chess_move)
            .expect("legal move must apply cleanly");
        let subtree = count_positions(&next, depth - 1);
        debug!(
            "{} contributes {} positions at depth {}",
            chess_move, subtree, depth
        );
        count += subtree;
    }
    count
}

fn generate_targeted_moves(
    position: &Position,
    from: Square,
    targets: Bitboard,
    moves: &mut MoveList,
) {
    let color = position.turn();
    let mut destinations = targets & !position.pieces(color).occupied();
    while !destinations.is_empty() {
        moves.push(Move::standard(from, destinations.pop_lsb()));
    }
}

fn generate_pawn_moves(position: &Position, from: Square, color: Color, moves: &mut MoveList) {
    let occupied = position.occupied();
    let enemies = position.pieces(color.opposite()).occupied();
    let (forward, start_rank, promotion_rank) = match color {
        Color::White => (1i8, 1u8, 7u8),
        Color::Black => (-1i8, 6u8, 0u8),
    };

    let push_rank = (from.rank() as i8 + forward) as u8;
    let push = Square::from_file_rank(from.file(), push_rank);
    if !push.to_bitboard().overlaps(occupied) {
        push_pawn_move(from, push, push_rank == promotion_rank, moves);

        if from.rank() == start_rank {
            let double =
                Square::from_file_rank(from.file(), (from.rank() as i8 + 2 * forward) as u8);
            if !double.to_bitboard().overlaps(occupied) {
                moves.push(Move::double_pawn_push(from, double));
            }
        }
    }

    let mut captures = targets::pawn_attacks(from.to_bitboard(), color) & enemies;
    while !captures.is_empty() {
        let to = captures.pop_lsb();
        push_pawn_move(from, to, to.rank() == promotion_rank, moves);
    }

    if let Some(target) = position.en_passant_target() {
        if targets::pawn_attacks(from.to_bitboard(), color).overlaps(target.to_bitboard()) {
            moves.push(Move::en_passant(from, target));
        }
    }
}

fn push_pawn_move(from: Square, to: Square, promotes: bool, moves: &mut MoveList) {
    if promotes {
        for piece in PAWN_PROMOTIONS {
            moves.push(Move::promote(from, to, piece));
        }
    } else {
        moves.push(Move::standard(from, to));
    }
}

fn generate_castle_moves(position: &Position, color: Color, moves: &mut MoveList) {
    use crate::bitboard::square::{A1, A8, B1, B8, C1, C8, D1, D8, E1, E8, F1, F8, G1, G8, H1, H8};

    let (king_home, kingside_path, queenside_path, queenside_king_path, kingside_rook, queenside_rook) =
        match color {
            Color::White => (
                E1,
                F1.to_bitboard() | G1.to_bitboard(),
                B1.to_bitboard() | C1.to_bitboard() | D1.to_bitboard(),
                C1.to_bitboard() | D1.to_bitboard(),
                H1,
                A1,
            ),
            Color::Black => (
                E8,
                F8.to_bitboard() | G8.to_bitboard(),
                B8.to_bitboard() | C8.to_bitboard() | D8.to_bitboard(),
                C8.to_bitboard() | D8.to_bitboard(),
                H8,
                A8,
            ),
        };

    if position.get(king_home) != Some((Piece::King, color)) {
        return;
    }

    let occupied = position.occupied();
    let attacked = attacked_squares(position, color.opposite());
    if attacked.overlaps(king_home.to_bitboard()) {
        return;
    }

    if position.castle_rights() & kingside_rights(color) != 0
        && position.get(kingside_rook) == Some((Piece::Rook, color))
        && !occupied.overlaps(kingside_path)
        && !attacked.overlaps(kingside_path)
    {
        moves.push(Move::castle_kingside(color));
    }

    // b1/b8 must be empty but may be attacked; the king only crosses c and d
    if position.castle_rights() & queenside_rights(color) != 0
        && position.get(queenside_rook) == Some((Piece::Rook, color))
        && !occupied.overlaps(queenside_path)
        && !attacked.overlaps(queenside_king_path)
    {
        moves.push(Move::castle_queenside(color));
    }
}
