//! Game state management: move history, repetition tracking, and terminal
//! status detection on top of the rules layer.

use log::debug;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::bitboard::Bitboard;
use crate::board::color::Color;
use crate::board::error::BoardError;
use crate::board::piece::Piece;
use crate::board::{Position, PositionSignature};
use crate::chess_move::Move;
use crate::move_generator::{is_in_check, legal_moves, MoveList};

/// Where the game stands. Checkmate and stalemate are determined by the legal
/// move list; the draw variants fire automatically the moment their condition
/// holds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    InProgress,
    Checkmate,
    Stalemate,
    DrawByRepetition,
    DrawByFiftyMove,
    DrawByInsufficientMaterial,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::InProgress
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move `{chess_move}`")]
    IllegalMove { chess_move: Move },
    #[error("the game is over")]
    GameOver,
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// A game in progress: the current position plus everything the position
/// alone cannot answer, namely the move history and the repetition counts
/// that drive the threefold rule.
pub struct GameState {
    position: Position,
    initial: Position,
    history: Vec<(Move, Position)>,
    repetition_counts: FxHashMap<PositionSignature, u8>,
    status: Status,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A fresh game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::starting_position())
    }

    /// A game starting from an arbitrary position, e.g. one imported from
    /// FEN. The initial position counts as its first repetition occurrence.
    pub fn from_position(position: Position) -> Self {
        let mut repetition_counts = FxHashMap::default();
        repetition_counts.insert(position.signature(), 1);

        let mut state = Self {
            initial: position.clone(),
            position,
            history: Vec::new(),
            repetition_counts,
            status: Status::InProgress,
        };
        state.status = state.compute_status();
        state
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// The moves played so far, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|(chess_move, _)| chess_move)
    }

    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number()
    }

    /// The legal moves in the current position. Empty once the game has
    /// reached a terminal status.
    pub fn legal_moves(&self) -> MoveList {
        if self.status.is_terminal() {
            return MoveList::new();
        }
        legal_moves(&self.position)
    }

    /// Plays a move. The move must be a member of the current legal move
    /// list; anything else, including any move after the game has ended, is
    /// rejected and the state is left untouched.
    pub fn make_move(&mut self, chess_move: Move) -> Result<Status, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver);
        }
        if !legal_moves(&self.position).contains(&chess_move) {
            return Err(GameError::IllegalMove { chess_move });
        }

        let next = self.position.apply(&chess_move)?;
        debug!("{} played {}", self.position.turn(), chess_move);

        let previous = std::mem::replace(&mut self.position, next);
        self.history.push((chess_move, previous));
        *self
            .repetition_counts
            .entry(self.position.signature())
            .or_insert(0) += 1;
        self.status = self.compute_status();

        Ok(self.status)
    }

    /// Rewinds the last move played, restoring the prior position, its
    /// repetition count, and an in-progress status. Returns the rewound move,
    /// or `None` at the start of the game.
    pub fn undo_move(&mut self) -> Option<Move> {
        let (chess_move, previous) = self.history.pop()?;

        let signature = self.position.signature();
        if let Some(count) = self.repetition_counts.get_mut(&signature) {
            *count -= 1;
            if *count == 0 {
                self.repetition_counts.remove(&signature);
            }
        }

        self.position = previous;
        self.status = self.compute_status();
        Some(chess_move)
    }

    /// Resets the game to its initial position, discarding all history.
    pub fn reset(&mut self) {
        *self = Self::from_position(self.initial.clone());
    }

    fn compute_status(&self) -> Status {
        if legal_moves(&self.position).is_empty() {
            return if is_in_check(&self.position, self.position.turn()) {
                Status::Checkmate
            } else {
                Status::Stalemate
            };
        }

        if insufficient_material(&self.position) {
            return Status::DrawByInsufficientMaterial;
        }
        if self.position.halfmove_clock() >= 100 {
            return Status::DrawByFiftyMove;
        }
        if self
            .repetition_counts
            .get(&self.position.signature())
            .copied()
            .unwrap_or(0)
            >= 3
        {
            return Status::DrawByRepetition;
        }

        Status::InProgress
    }
}

/// Whether neither side can possibly deliver checkmate: king against king,
/// king against king and one minor piece, or king and bishop against king
/// and bishop with both bishops on the same square color.
fn insufficient_material(position: &Position) -> bool {
    let white = position.pieces(Color::White);
    let black = position.pieces(Color::Black);

    // any pawn, rook, or queen means mate remains possible
    for pieces in [white, black] {
        if !(pieces.locate(Piece::Pawn)
            | pieces.locate(Piece::Rook)
            | pieces.locate(Piece::Queen))
        .is_empty()
        {
            return false;
        }
    }

    let white_minors = white.locate(Piece::Knight) | white.locate(Piece::Bishop);
    let black_minors = black.locate(Piece::Knight) | black.locate(Piece::Bishop);
    let minor_count = white_minors.count_ones() + black_minors.count_ones();

    match minor_count {
        0 | 1 => true,
        2 => {
            let bishops = white.locate(Piece::Bishop) | black.locate(Piece::Bishop);
            if bishops.count_ones() != 2 || white_minors.count_ones() != 1 {
                return false;
            }
            // one bishop each; drawn only when they share a square color
            bishops & Bitboard::LIGHT_SQUARES == bishops
                || bishops & Bitboard::DARK_SQUARES == bishops
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::square::*;
    use crate::chess_move::MoveFlag;
    use crate::{chess_position, std_move};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn play(state: &mut GameState, notation: &str) -> Status {
        let chess_move = Move::from_coordinate(notation, state.position()).unwrap();
        state.make_move(chess_move).unwrap()
    }

    #[test]
    fn test_fools_mate() {
        init_logging();
        let mut state = GameState::new();

        play(&mut state, "f2f3");
        play(&mut state, "e7e5");
        play(&mut state, "g2g4");
        let status = play(&mut state, "d8h4");

        assert_eq!(Status::Checkmate, status);
        assert_eq!(Status::Checkmate, state.status());
        assert!(state.legal_moves().is_empty());
        assert_eq!(4, state.history().count());
    }

    #[test]
    fn test_stalemate() {
        init_logging();
        // black to move with the king cornered on a8 and no legal move
        let mut position = chess_position! {
            k.......
            ........
            .QK.....
            ........
            ........
            ........
            ........
            ........
        };
        position.set_turn(Color::Black);

        let state = GameState::from_position(position);
        assert_eq!(Status::Stalemate, state.status());
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_moves_rejected_after_game_over() {
        init_logging();
        let mut state = GameState::new();
        play(&mut state, "f2f3");
        play(&mut state, "e7e5");
        play(&mut state, "g2g4");
        play(&mut state, "d8h4");

        assert_eq!(
            Err(GameError::GameOver),
            state.make_move(std_move!(A2, A3))
        );
    }

    #[test]
    fn test_illegal_move_rejected_and_state_untouched() {
        init_logging();
        let mut state = GameState::new();
        let before = state.position().clone();

        assert_eq!(
            Err(GameError::IllegalMove {
                chess_move: std_move!(E2, E5)
            }),
            state.make_move(std_move!(E2, E5))
        );
        assert_eq!(before, *state.position());
        assert_eq!(0, state.history().count());
    }

    #[test]
    fn test_en_passant_window_lasts_one_move() {
        init_logging();
        let mut state = GameState::new();
        play(&mut state, "e2e4");
        play(&mut state, "a7a6");
        play(&mut state, "e4e5");
        play(&mut state, "d7d5");

        // the bypassed d pawn is capturable right now and only now
        let captures: Vec<Move> = state
            .legal_moves()
            .into_iter()
            .filter(|m| m.flag() == MoveFlag::EnPassant)
            .collect();
        assert_eq!(1, captures.len());
        assert_eq!(E5, captures[0].from());
        assert_eq!(D6, captures[0].to());

        // decline it; the window closes
        play(&mut state, "b1c3");
        play(&mut state, "a6a5");
        assert!(state
            .legal_moves()
            .iter()
            .all(|m| m.flag() != MoveFlag::EnPassant));
    }

    #[test]
    fn test_en_passant_capture_removes_bypassed_pawn() {
        init_logging();
        let mut state = GameState::new();
        play(&mut state, "e2e4");
        play(&mut state, "a7a6");
        play(&mut state, "e4e5");
        play(&mut state, "d7d5");
        play(&mut state, "e5d6");

        assert_eq!(None, state.position().get(D5));
        assert_eq!(
            Some((Piece::Pawn, Color::White)),
            state.position().get(D6)
        );
    }

    #[test]
    fn test_threefold_repetition_draw() {
        init_logging();
        let mut state = GameState::new();

        // shuffle the knights; the starting signature recurs after each
        // full out-and-back cycle
        for _ in 0..2 {
            play(&mut state, "g1f3");
            play(&mut state, "g8f6");
            play(&mut state, "f3g1");
            let status = play(&mut state, "f6g8");
            if status.is_terminal() {
                break;
            }
        }

        assert_eq!(Status::DrawByRepetition, state.status());
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_fifty_move_rule_draw() {
        init_logging();
        let mut position = chess_position! {
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            R...K...
        };
        position.set_halfmove_clock(99);
        let mut state = GameState::from_position(position);

        assert_eq!(Status::InProgress, state.status());
        let status = state.make_move(std_move!(A1, A2)).unwrap();
        assert_eq!(Status::DrawByFiftyMove, status);
    }

    #[test]
    fn test_halfmove_clock_reset_defers_fifty_move_draw() {
        init_logging();
        let mut position = chess_position! {
            ....k...
            ........
            ........
            p.......
            ........
            ........
            ........
            R...K...
        };
        position.set_halfmove_clock(99);
        let mut state = GameState::from_position(position);

        // a capture resets the clock, so no draw fires
        let status = state.make_move(std_move!(A1, A5)).unwrap();
        assert_eq!(Status::InProgress, status);
        assert_eq!(0, state.position().halfmove_clock());
    }

    #[test]
    fn test_insufficient_material_two_kings() {
        init_logging();
        let position = chess_position! {
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            ....K...
        };
        let state = GameState::from_position(position);
        assert_eq!(Status::DrawByInsufficientMaterial, state.status());
    }

    #[test]
    fn test_insufficient_material_lone_minor() {
        init_logging();
        let position = chess_position! {
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            ..N.K...
        };
        let state = GameState::from_position(position);
        assert_eq!(Status::DrawByInsufficientMaterial, state.status());
    }

    #[test]
    fn test_insufficient_material_same_color_bishops() {
        init_logging();
        // c1 and f4 are both dark squares
        let position = chess_position! {
            ....k...
            ........
            ........
            ........
            .....b..
            ........
            ........
            ..B.K...
        };
        let state = GameState::from_position(position);
        assert_eq!(Status::DrawByInsufficientMaterial, state.status());
    }

    #[test]
    fn test_sufficient_material_opposite_color_bishops() {
        init_logging();
        // c1 is dark, e4 is light
        let position = chess_position! {
            ....k...
            ........
            ........
            ........
            ....b...
            ........
            ........
            ..B.K...
        };
        let state = GameState::from_position(position);
        assert_eq!(Status::InProgress, state.status());
    }

    #[test]
    fn test_sufficient_material_with_rook() {
        init_logging();
        let position = chess_position! {
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            R...K...
        };
        let state = GameState::from_position(position);
        assert_eq!(Status::InProgress, state.status());
    }

    #[test]
    fn test_undo_restores_position_and_status() {
        init_logging();
        let mut state = GameState::new();
        let start = state.position().clone();

        play(&mut state, "f2f3");
        play(&mut state, "e7e5");
        play(&mut state, "g2g4");
        play(&mut state, "d8h4");
        assert_eq!(Status::Checkmate, state.status());

        let rewound = state.undo_move().unwrap();
        assert_eq!("d8h4", rewound.to_string());
        assert_eq!(Status::InProgress, state.status());
        assert!(!state.legal_moves().is_empty());

        state.undo_move();
        state.undo_move();
        state.undo_move();
        assert_eq!(start, *state.position());
        assert_eq!(None, state.undo_move());
    }

    #[test]
    fn test_undo_reopens_repetition_window() {
        init_logging();
        let mut state = GameState::new();
        for _ in 0..2 {
            play(&mut state, "g1f3");
            play(&mut state, "g8f6");
            play(&mut state, "f3g1");
            if play(&mut state, "f6g8").is_terminal() {
                break;
            }
        }
        assert_eq!(Status::DrawByRepetition, state.status());

        state.undo_move();
        assert_eq!(Status::InProgress, state.status());
    }

    #[test]
    fn test_reset_discards_history() {
        init_logging();
        let mut state = GameState::new();
        play(&mut state, "e2e4");
        play(&mut state, "e7e5");

        state.reset();
        assert_eq!(Position::starting_position(), *state.position());
        assert_eq!(0, state.history().count());
        assert_eq!(Status::InProgress, state.status());
        assert_eq!(20, state.legal_moves().len());
    }

    #[test]
    fn test_from_position_via_fen() {
        init_logging();
        let position = Position::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let state = GameState::from_position(position);
        assert_eq!(Status::DrawByInsufficientMaterial, state.status());
    }
}
