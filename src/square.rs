use std::fmt::{Display, Formatter};

/// A cell of the board. `x` is the file (0 is the a-file), `y` the row
/// counted from Black's home row, so White's pieces start on `y = 6` and
/// `y = 7`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub x: i8,
    pub y: i8,
}

impl Square {
    pub const fn new(x: i8, y: i8) -> Square {
        Square { x, y }
    }

    /// Checks whether a given square is on the board
    /// ```
    /// use gambit::square::Square;
    /// assert!(Square::new(0, 7).is_valid());
    /// assert!(!Square::new(8, 3).is_valid());
    /// assert!(!Square::new(2, -1).is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        (0..8).contains(&self.x) && (0..8).contains(&self.y)
    }

    pub fn offset(&self, dx: i8, dy: i8) -> Square {
        Square::new(self.x + dx, self.y + dy)
    }

    /// Light squares are the ones where `x + y` is even (a8, h1, ...)
    pub fn is_light(&self) -> bool {
        (self.x + self.y) % 2 == 0
    }

    /// Parses a square from a given string slice,
    /// only caring that the first two characters form a valid square representation
    /// ```
    /// use gambit::square::Square;
    /// assert_eq!(Square::parse("e4"), Some(Square::new(4, 4)));
    /// assert_eq!(Square::parse("d2someotherstuff"), Some(Square::new(3, 6)));
    /// assert_eq!(Square::parse("randoma1stuff"), None);
    /// assert_eq!(Square::parse("k9"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Square> {
        let mut chars_iter = s.chars();
        let x = match chars_iter.next() {
            Some(c @ 'a'..='h') => c as i8 - 'a' as i8,
            _ => return None,
        };
        let y = match chars_iter.next().and_then(|c| c.to_digit(10)) {
            Some(rank) if (1..=8).contains(&rank) => 8 - rank as i8,
            _ => return None,
        };
        Some(Square::new(x, y))
    }
}

/// Returns the algebraic representation of a square
/// ```
/// use gambit::square::Square;
/// assert_eq!(Square::new(4, 4).to_string(), "e4");
/// assert_eq!(Square::new(3, 6).to_string(), "d2");
/// assert_eq!(Square::new(9, 9).to_string(), "**");
/// ```
impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            return write!(f, "**");
        }
        let file = (b'a' + self.x as u8) as char;
        write!(f, "{}{}", file, 8 - self.y)
    }
}
