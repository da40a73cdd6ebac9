//! Bubble colours and the text colour that reads on top of them.

/// Fill colour of a bubble, chosen from its X value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BubbleColor {
    Yellow,
    Green,
    Red,
    Blue,
    SteelBlue,
}

/// Tooltip text colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub const fn css(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

/// Sign-preserving `floor(x) mod 4`; negative X gives -3..=0.
#[allow(clippy::cast_possible_truncation)]
fn floor_mod4(x: f64) -> i64 {
    (x.floor() % 4.0) as i64
}

impl BubbleColor {
    /// Colour for an X value: `floor(x) mod 4` picks yellow, green, red or blue.
    ///
    /// Remainders outside 0..=3 (negative X) fall back to steel blue.
    pub fn for_x(x: f64) -> Self {
        match floor_mod4(x) {
            0 => Self::Yellow,
            1 => Self::Green,
            2 => Self::Red,
            3 => Self::Blue,
            _ => Self::SteelBlue,
        }
    }

    pub const fn css(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::SteelBlue => "steelblue",
        }
    }

    /// Perceived brightness on a 0-255 scale.
    pub const fn brightness(self) -> u8 {
        match self {
            Self::Yellow => 255,
            Self::Green => 80,
            Self::Red => 100,
            Self::Blue => 80,
            Self::SteelBlue => 110,
        }
    }

    /// Black on bright fills, white on dark ones.
    pub const fn contrast_text(self) -> TextColor {
        if self.brightness() > 128 {
            TextColor::Black
        } else {
            TextColor::White
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0 => BubbleColor::Yellow)]
    #[test_case(1.9 => BubbleColor::Green)]
    #[test_case(2.0 => BubbleColor::Red)]
    #[test_case(3.5 => BubbleColor::Blue)]
    #[test_case(4.0 => BubbleColor::Yellow)]
    #[test_case(402.7 => BubbleColor::Red)]
    #[test_case(-1.0 => BubbleColor::SteelBlue)]
    #[test_case(-4.0 => BubbleColor::Yellow)]
    fn test_color_for_x(x: f64) -> BubbleColor {
        BubbleColor::for_x(x)
    }

    #[test]
    fn test_color_is_deterministic_per_remainder() {
        for base in 0..4 {
            let first = BubbleColor::for_x(f64::from(base));
            for k in 1..50 {
                assert_eq!(BubbleColor::for_x(f64::from(base + 4 * k)), first);
            }
        }
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(BubbleColor::Yellow.contrast_text(), TextColor::Black);
        assert_eq!(BubbleColor::Green.contrast_text(), TextColor::White);
        assert_eq!(BubbleColor::Red.contrast_text(), TextColor::White);
        assert_eq!(BubbleColor::Blue.contrast_text(), TextColor::White);
        assert_eq!(BubbleColor::SteelBlue.contrast_text(), TextColor::White);
    }
}
