use std::fmt;
use std::str::FromStr;

use shakmaty::{Color, Piece, Role};
use thiserror::Error;

/// A square on the 8×8 grid, addressed by row and column (both 0-7).
///
/// Row 0 is the far rank (black's home rank, "8" in algebraic notation),
/// row 7 the near rank (white's home rank, "1").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square if both coordinates are in range.
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Square offset by signed deltas, or `None` if it leaves the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = i8::try_from(self.row).ok()?.checked_add(d_row)?;
        let col = i8::try_from(self.col).ok()?.checked_add(d_col)?;
        Self::new(u8::try_from(row).ok()?, u8::try_from(col).ok()?)
    }

    /// All 64 squares in row-major order, starting at row 0.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }

    /// File letter ('a'-'h').
    pub fn file(self) -> char {
        (b'a' + self.col) as char
    }

    /// Rank digit (1-8).
    pub fn rank(self) -> u8 {
        8 - self.row
    }
}

/// Parse algebraic notation like "e4" into a Square.
///
/// # Examples
/// ```
/// # use duo_chess::board::Square;
/// let square: Square = "e2".parse().unwrap();
/// assert_eq!((square.row(), square.col()), (6, 4));
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::WrongLength);
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(SquareParseError::BadFile);
        }
        let rank = rank.to_digit(10).ok_or(SquareParseError::BadRank)?;
        if !(1..=8).contains(&rank) {
            return Err(SquareParseError::BadRank);
        }

        Ok(Square {
            row: 8 - rank as u8,
            col: file as u8 - b'a',
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SquareParseError {
    #[error("square must be 2 characters (e.g., 'e4')")]
    WrongLength,
    #[error("file must be a-h")]
    BadFile,
    #[error("rank must be 1-8")]
    BadRank,
}

/// Error type for parsing a FEN piece-placement field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 squares")]
    RankWidth { rank: usize },
    #[error("invalid piece letter '{0}'")]
    BadPiece(char),
}

const BACK_RANK: [Role; 8] = [
    Role::Rook,
    Role::Knight,
    Role::Bishop,
    Role::Queen,
    Role::King,
    Role::Bishop,
    Role::Knight,
    Role::Rook,
];

/// 8×8 grid of optional pieces.
///
/// Pure data: accessors do no validation, that is the job of [`crate::rules`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting layout: black on rows 0-1, white on rows 6-7.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for (col, role) in BACK_RANK.into_iter().enumerate() {
            board.cells[0][col] = Some(Piece { role, color: Color::Black });
            board.cells[1][col] = Some(Role::Pawn.of(Color::Black));
            board.cells[6][col] = Some(Role::Pawn.of(Color::White));
            board.cells[7][col] = Some(Piece { role, color: Color::White });
        }
        board
    }

    pub const fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
        }
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.cells[square.row as usize][square.col as usize]
    }

    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.row as usize][square.col as usize] = piece;
    }

    /// Moves whatever stands on `from` onto `to`, clearing `from`.
    ///
    /// Returns the piece previously on `to`, if any.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.get(from);
        let captured = self.get(to);
        self.set(to, moving);
        self.set(from, None);
        captured
    }

    /// Whether every square strictly between `from` and `to` is empty.
    ///
    /// The two squares must share a row, column or diagonal; adjacent squares are
    /// trivially clear.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let d_row = (to.row as i8 - from.row as i8).signum();
        let d_col = (to.col as i8 - from.col as i8).signum();
        debug_assert!(from != to, "path between identical squares");

        let mut current = from;
        while let Some(next) = current.offset(d_row, d_col) {
            if next == to {
                return true;
            }
            if self.get(next).is_some() {
                return false;
            }
            current = next;
        }
        // Only reachable when the squares are not aligned.
        false
    }

    /// All occupied squares with their pieces, row-major.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
    }

    /// Number of copies of `piece` on the board.
    pub fn count(&self, piece: Piece) -> usize {
        self.pieces().filter(|(_, p)| *p == piece).count()
    }

    /// Parses the piece-placement field of a FEN string, e.g.
    /// `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`.
    ///
    /// Anything after the first whitespace (side to move, castling, ...) is ignored.
    pub fn from_placement(placement: &str) -> Result<Self, PlacementError> {
        let field = placement.split_whitespace().next().unwrap_or_default();
        let ranks: Vec<&str> = field.split('/').collect();
        if ranks.len() != 8 {
            return Err(PlacementError::RankCount(ranks.len()));
        }

        let mut board = Self::empty();
        for (row, rank) in ranks.into_iter().enumerate() {
            let mut col = 0usize;
            for ch in rank.chars() {
                if let Some(skip) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    col += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(ch).ok_or(PlacementError::BadPiece(ch))?;
                if col >= 8 {
                    return Err(PlacementError::RankWidth { rank: row });
                }
                board.cells[row][col] = Some(piece);
                col += 1;
            }
            if col != 8 {
                return Err(PlacementError::RankWidth { rank: row });
            }
        }
        Ok(board)
    }
}

/// Writes the FEN piece-placement field, row 0 first.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            if row > 0 {
                f.write_str("/")?;
            }
            let mut empty = 0;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board").field(&format_args!("{self}")).finish()
    }
}

impl FromStr for Board {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_placement(s)
    }
}
