//! Chess primitives commonly used within [`crate::chess`]: squares, colors and
//! pieces.

use std::fmt::{self, Write};
use std::ops::Not;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::chess::error::{Error, Result};

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use chessrules::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use chessrules::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// All squares in board scan order: rank-major, ascending (a1, b1, ...,
    /// h1, a2, ..., h8).
    #[rustfmt::skip]
    pub const ALL: [Self; BOARD_SIZE as usize] = [
        Self::A1, Self::B1, Self::C1, Self::D1, Self::E1, Self::F1, Self::G1, Self::H1,
        Self::A2, Self::B2, Self::C2, Self::D2, Self::E2, Self::F2, Self::G2, Self::H2,
        Self::A3, Self::B3, Self::C3, Self::D3, Self::E3, Self::F3, Self::G3, Self::H3,
        Self::A4, Self::B4, Self::C4, Self::D4, Self::E4, Self::F4, Self::G4, Self::H4,
        Self::A5, Self::B5, Self::C5, Self::D5, Self::E5, Self::F5, Self::G5, Self::H5,
        Self::A6, Self::B6, Self::C6, Self::D6, Self::E6, Self::F6, Self::G6, Self::H6,
        Self::A7, Self::B7, Self::C7, Self::D7, Self::E7, Self::F7, Self::G7, Self::H7,
        Self::A8, Self::B8, Self::C8, Self::D8, Self::E8, Self::F8, Self::G8, Self::H8,
    ];

    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::ALL[(file as u8 + (rank as u8) * BOARD_WIDTH) as usize]
    }

    /// Builds a square from zero-based `(rank, file)` indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if either index is outside
    /// `0..BOARD_WIDTH`.
    pub fn from_indices(rank: u8, file: u8) -> Result<Self> {
        Ok(Self::new(File::try_from(file)?, Rank::try_from(rank)?))
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        File::ALL[(self as u8 % BOARD_WIDTH) as usize]
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self as u8 / BOARD_WIDTH) as usize]
    }

    /// Zero-based `(rank, file)` indices of the square.
    #[must_use]
    pub const fn indices(self) -> (u8, u8) {
        (self.rank() as u8, self.file() as u8)
    }

    /// Returns the square `d_rank` ranks and `d_file` files away or `None` if
    /// that steps off the board.
    #[must_use]
    pub fn offset(self, d_rank: i8, d_file: i8) -> Option<Self> {
        let (rank, file) = self.indices();
        let rank = i16::from(rank) + i16::from(d_rank);
        let file = i16::from(file) + i16::from(d_file);
        let width = i16::from(BOARD_WIDTH);
        if !(0..width).contains(&rank) || !(0..width).contains(&file) {
            return None;
        }
        Self::from_indices(u8::try_from(rank).ok()?, u8::try_from(file).ok()?).ok()
    }
}

impl TryFrom<&str> for Square {
    type Error = Error;

    /// Parses the two-character algebraic form of the square: a lowercase file
    /// letter within `a..=h` followed by a rank digit within `1..=8`.
    fn try_from(square: &str) -> Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            return Err(Error::InvalidCoordinate(format!(
                "square should be two-char, got \"{square}\" with {} chars",
                square.chars().count()
            )));
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(square: &str) -> Result<Self> {
        Self::try_from(square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Parses external square notation (e.g. "e4") into zero-based `(rank, file)`
/// indices.
///
/// ```
/// use chessrules::chess::core::parse;
///
/// assert_eq!(parse("a1"), Ok((0, 0)));
/// assert_eq!(parse("e4"), Ok((3, 4)));
/// assert!(parse("i9").is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidCoordinate`] for anything other than exactly two
/// characters `[a-h][1-8]`.
pub fn parse(square: &str) -> Result<(u8, u8)> {
    Square::try_from(square).map(Square::indices)
}

/// Inverse of [`parse`].
///
/// # Errors
///
/// Returns [`Error::InvalidCoordinate`] if either index is off the board.
pub fn format(rank: u8, file: u8) -> Result<String> {
    Square::from_indices(rank, file).map(|square| square.to_string())
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(char::from(b'a' + *self as u8))
    }
}

impl TryFrom<char> for File {
    type Error = Error;

    fn try_from(file: char) -> Result<Self> {
        match file {
            'a'..='h' => Ok(Self::ALL[(file as u8 - b'a') as usize]),
            _ => Err(Error::InvalidCoordinate(format!(
                "file should be within 'a'..='h', got '{file}'"
            ))),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = Error;

    fn try_from(column: u8) -> Result<Self> {
        Self::ALL.get(column as usize).copied().ok_or_else(|| {
            Error::InvalidCoordinate(format!(
                "file should be within 0..BOARD_WIDTH, got {column}"
            ))
        })
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// The rank where the pieces of given color start.
    #[must_use]
    pub const fn backrank(color: Color) -> Self {
        match color {
            Color::White => Self::One,
            Color::Black => Self::Eight,
        }
    }

    /// The rank pawns of given color start from and may double-step from.
    #[must_use]
    pub const fn pawns_starting(color: Color) -> Self {
        match color {
            Color::White => Self::Two,
            Color::Black => Self::Seven,
        }
    }

    /// The rank pawns of given color promote from: one step before the
    /// opponent's backrank.
    #[must_use]
    pub const fn pawns_promoting(color: Color) -> Self {
        match color {
            Color::White => Self::Seven,
            Color::Black => Self::Two,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = Error;

    fn try_from(rank: char) -> Result<Self> {
        match rank {
            '1'..='8' => Ok(Self::ALL[(rank as u8 - b'1') as usize]),
            _ => Err(Error::InvalidCoordinate(format!(
                "rank should be within '1'..='8', got '{rank}'"
            ))),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = Error;

    fn try_from(row: u8) -> Result<Self> {
        Self::ALL.get(row as usize).copied().ok_or_else(|| {
            Error::InvalidCoordinate(format!("rank should be within 0..BOARD_WIDTH, got {row}"))
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two sides: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Rank delta of a single pawn push: white advances towards increasing
    /// ranks.
    #[must_use]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Human-readable name, used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Not for Color {
    type Output = Self;

    /// "Flips" the color.
    fn not(self) -> Self::Output {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => anyhow::bail!("color should be 'w' or 'b', got '{color}'"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Pieces a pawn can be promoted to, strongest first.
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// Uppercase letter used in move notation. Pawns don't have one.
    #[must_use]
    pub const fn notation_letter(self) -> Option<char> {
        match self {
            Self::King => Some('K'),
            Self::Queen => Some('Q'),
            Self::Rook => Some('R'),
            Self::Bishop => Some('B'),
            Self::Knight => Some('N'),
            Self::Pawn => None,
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = Error;

    /// Parses the promotion selector: one of "qrbn" in either case.
    fn try_from(symbol: char) -> Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => Err(Error::IllegalMove(format!(
                "promotion piece should be one of \"qrbn\", got '{symbol}'"
            ))),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player. Pieces do not know where
/// they are: [`crate::chess::board::Board`] is the only source of position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Color,
    #[allow(missing_docs)]
    pub kind: PieceKind,
    /// Set once a king or a rook leaves its square: such pieces can no longer
    /// castle.
    pub has_moved: bool,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[must_use]
    pub const fn new(owner: Color, kind: PieceKind) -> Self {
        Self {
            owner,
            kind,
            has_moved: false,
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => anyhow::bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self::new(owner, kind))
    }
}

impl fmt::Display for Piece {
    /// Prints the FEN symbol: uppercase for white, lowercase for black.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            Color::White => f.write_str(&symbol.to_ascii_uppercase()),
            Color::Black => f.write_str(&symbol),
        }
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves, player loses ability to castle its corresponding side.
    ///
    /// The rights are derived from the pieces' movement flags and only
    /// indicate availability: whether castling is legal right now also
    /// depends on checks and the squares between the king and the rook.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const NONE = 0;
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b0001;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0010;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0100;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b1000;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// Rights for castling towards given side.
    #[must_use]
    pub const fn side(color: Color, short: bool) -> Self {
        match (color, short) {
            (Color::White, true) => Self::WHITE_SHORT,
            (Color::White, false) => Self::WHITE_LONG,
            (Color::Black, true) => Self::BLACK_SHORT,
            (Color::Black, false) => Self::BLACK_LONG,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] from the FEN format. The user is responsible
    /// for providing valid input cleaned up from the actual FEN chunk.
    ///
    /// CastlingRights := [K] [Q] [k] [q] || -
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::NONE);
        }
        let mut rights = Self::NONE;
        for symbol in input.chars() {
            let right = match symbol {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => anyhow::bail!("unknown castle rights: {input}"),
            };
            anyhow::ensure!(!rights.contains(right), "duplicate castle rights: {input}");
            rights |= right;
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NONE {
            return f.write_char('-');
        }
        for (right, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(right) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}
