//! Paintable cell colors.

/// A cell color from the nine-slot palette.
///
/// Cells carry `Option<CellColor>`, with `None` meaning unpainted. The
/// palette index (1-9) is the stable identity used by the persisted save
/// form; display names and swatches are a rendering concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CellColor {
    /// Palette slot 1.
    Red,
    /// Palette slot 2.
    Orange,
    /// Palette slot 3.
    Yellow,
    /// Palette slot 4.
    Green,
    /// Palette slot 5.
    Teal,
    /// Palette slot 6.
    Blue,
    /// Palette slot 7.
    Purple,
    /// Palette slot 8.
    Pink,
    /// Palette slot 9.
    Gray,
}

impl CellColor {
    /// Array containing all colors in palette order.
    pub const ALL: [Self; 9] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Teal,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Gray,
    ];

    /// Returns the palette index of this color (1-9).
    #[must_use]
    pub fn index(self) -> u8 {
        #[expect(clippy::cast_possible_truncation)]
        let i = Self::ALL.iter().position(|&c| c == self).unwrap_or(0) as u8;
        i + 1
    }

    /// Creates a color from its palette index (1-9), or `None` for any other
    /// value. Index 0 is the persisted encoding of an unpainted cell.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=9 => Some(Self::ALL[usize::from(index) - 1]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for color in CellColor::ALL {
            assert_eq!(CellColor::from_index(color.index()), Some(color));
        }
        assert_eq!(CellColor::from_index(0), None);
        assert_eq!(CellColor::from_index(10), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CellColor::Teal), "Teal");
    }
}
