use crate::bitboard::{Bitboard, Square};

/// A compass direction of sliding-piece travel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

pub const ROOK_DIRS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

pub const BISHOP_DIRS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

impl Direction {
    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
            Direction::NorthWest,
        ]
    }

    /// (file delta, rank delta) of a single step.
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// Whether a step in this direction increases the square index. Decides
    /// which end of a blocker set is nearest to the sliding piece.
    pub fn is_ascending(self) -> bool {
        let (file_delta, rank_delta) = self.offset();
        rank_delta * 8 + file_delta > 0
    }
}

/// Precomputed rays from every square in every direction, exclusive of the
/// origin square and extending to the board edge.
pub struct RayTable {
    rays: [[Bitboard; 8]; 64],
}

impl Default for RayTable {
    fn default() -> Self {
        let mut table = RayTable {
            rays: [[Bitboard::EMPTY; 8]; 64],
        };
        for square_index in 0..64u8 {
            let square = Square::new(square_index);
            for dir in Direction::all() {
                table.rays[square_index as usize][dir as usize] = generate_ray(square, dir);
            }
        }
        table
    }
}

impl RayTable {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, square: Square, dir: Direction) -> Bitboard {
        self.rays[square.index()][dir as usize]
    }
}

fn generate_ray(square: Square, dir: Direction) -> Bitboard {
    let (file_delta, rank_delta) = dir.offset();
    let mut ray = Bitboard::EMPTY;

    let mut file = square.file() as i8 + file_delta;
    let mut rank = square.rank() as i8 + rank_delta;
    while (0..8).contains(&file) && (0..8).contains(&rank) {
        ray |= Square::from_file_rank(file as u8, rank as u8).to_bitboard();
        file += file_delta;
        rank += rank_delta;
    }

    ray
}
