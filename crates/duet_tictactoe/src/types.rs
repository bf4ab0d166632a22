//! Core domain types for tic-tac-toe.

use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::wire::WireMark;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A square on the tic-tac-toe board.
///
/// On the wire a square is one of `"X"`, `"O"` or `"EMPTY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "WireMark", into = "WireMark")]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// A cell on the board, identified by row (Top/Middle/Bottom) and
/// column (Left/Center/Right).
///
/// Serializes as the short identifier (`"TL"`, `"MC"`, ...). The long
/// identifiers (`"TOP_LEFT"`, `"MIDDLE_CENTER"`, ...) are accepted on input.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::IntoStaticStr,
)]
pub enum Cell {
    /// Top-left (index 0)
    #[serde(rename = "TL", alias = "TOP_LEFT")]
    #[strum(serialize = "TL")]
    TopLeft,
    /// Top-center (index 1)
    #[serde(rename = "TC", alias = "TOP_CENTER")]
    #[strum(serialize = "TC")]
    TopCenter,
    /// Top-right (index 2)
    #[serde(rename = "TR", alias = "TOP_RIGHT")]
    #[strum(serialize = "TR")]
    TopRight,
    /// Middle-left (index 3)
    #[serde(rename = "ML", alias = "MIDDLE_LEFT")]
    #[strum(serialize = "ML")]
    MiddleLeft,
    /// Center (index 4)
    #[serde(rename = "MC", alias = "MIDDLE_CENTER")]
    #[strum(serialize = "MC")]
    Center,
    /// Middle-right (index 5)
    #[serde(rename = "MR", alias = "MIDDLE_RIGHT")]
    #[strum(serialize = "MR")]
    MiddleRight,
    /// Bottom-left (index 6)
    #[serde(rename = "BL", alias = "BOTTOM_LEFT")]
    #[strum(serialize = "BL")]
    BottomLeft,
    /// Bottom-center (index 7)
    #[serde(rename = "BC", alias = "BOTTOM_CENTER")]
    #[strum(serialize = "BC")]
    BottomCenter,
    /// Bottom-right (index 8)
    #[serde(rename = "BR", alias = "BOTTOM_RIGHT")]
    #[strum(serialize = "BR")]
    BottomRight,
}

impl Cell {
    /// All 9 cells in row-major order.
    pub const ALL: [Cell; 9] = [
        Cell::TopLeft,
        Cell::TopCenter,
        Cell::TopRight,
        Cell::MiddleLeft,
        Cell::Center,
        Cell::MiddleRight,
        Cell::BottomLeft,
        Cell::BottomCenter,
        Cell::BottomRight,
    ];

    /// Short wire identifier (`"TL"` ... `"BR"`).
    pub fn identifier(self) -> &'static str {
        self.into()
    }

    /// Converts the cell to its row-major board index (0-8).
    pub fn to_index(self) -> usize {
        match self {
            Cell::TopLeft => 0,
            Cell::TopCenter => 1,
            Cell::TopRight => 2,
            Cell::MiddleLeft => 3,
            Cell::Center => 4,
            Cell::MiddleRight => 5,
            Cell::BottomLeft => 6,
            Cell::BottomCenter => 7,
            Cell::BottomRight => 8,
        }
    }

    /// Creates a cell from its board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// 3x3 tic-tac-toe board.
///
/// Serializes as an object with one entry per [`Cell`]; deserializing
/// rejects boards with missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given cell.
    pub fn get(&self, cell: Cell) -> Square {
        self.squares[cell.to_index()]
    }

    /// Sets the square at the given cell.
    pub fn set(&mut self, cell: Cell, square: Square) {
        self.squares[cell.to_index()] = square;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.get(cell) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Cells that are still unoccupied, in row-major order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        Cell::ALL
            .iter()
            .copied()
            .filter(|cell| self.is_empty(*cell))
            .collect()
    }

    /// Number of squares holding the given player's mark.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|sq| **sq == Square::Occupied(player))
            .count()
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let symbol = match self.squares[row * 3 + col] {
                    Square::Empty => ' ',
                    Square::Occupied(Player::X) => 'X',
                    Square::Occupied(Player::O) => 'O',
                };
                result.push(symbol);
                if col < 2 {
                    result.push_str(" | ");
                }
            }
            if row < 2 {
                result.push_str("\n--+---+--\n");
            }
        }
        result
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Cell::ALL.len()))?;
        for cell in Cell::ALL {
            map.serialize_entry(&cell, &self.get(cell))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BoardVisitor)
    }
}

/// Reads a cell-keyed map; every cell exactly once, under either identifier.
struct BoardVisitor;

impl<'de> Visitor<'de> for BoardVisitor {
    type Value = Board;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map from cell identifier to mark")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Board, A::Error> {
        let mut seen = [false; 9];
        let mut board = Board::new();
        while let Some((cell, square)) = map.next_entry::<Cell, Square>()? {
            let index = cell.to_index();
            if seen[index] {
                return Err(A::Error::custom(format!("duplicate entry for cell {cell}")));
            }
            seen[index] = true;
            board.set(cell, square);
        }
        if let Some(missing) = Cell::ALL.into_iter().find(|cell| !seen[cell.to_index()]) {
            return Err(A::Error::custom(format!("board is missing cell {missing}")));
        }
        Ok(board)
    }
}
