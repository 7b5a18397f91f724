//! Named palette colors for style builders

use report_sheets_core::Color;

macro_rules! palette {
    ($($name:ident => ($r:expr, $g:expr, $b:expr)),+ $(,)?) => {
        /// Named colors of the legacy spreadsheet palette
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Colors {
            $($name),+
        }

        impl Colors {
            /// Every palette entry in palette order
            pub const ALL: &'static [Colors] = &[$(Colors::$name),+];

            pub const fn color(self) -> Color {
                match self {
                    $(Colors::$name => Color::rgb($r, $g, $b)),+
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Colors::$name => stringify!($name)),+
                }
            }
        }
    };
}

palette! {
    Black => (0, 0, 0),
    Brown => (153, 51, 0),
    OliveGreen => (51, 51, 0),
    DarkGreen => (0, 51, 0),
    DarkTeal => (0, 51, 102),
    DarkBlue => (0, 0, 128),
    Indigo => (51, 51, 153),
    Grey80Percent => (51, 51, 51),
    Orange => (255, 102, 0),
    DarkYellow => (128, 128, 0),
    Green => (0, 128, 0),
    Teal => (0, 128, 128),
    Blue => (0, 0, 255),
    BlueGrey => (102, 102, 153),
    Grey50Percent => (128, 128, 128),
    Red => (255, 0, 0),
    LightOrange => (255, 153, 0),
    Lime => (153, 204, 0),
    SeaGreen => (51, 153, 102),
    Aqua => (51, 204, 204),
    LightBlue => (51, 102, 255),
    Violet => (128, 0, 128),
    Grey40Percent => (150, 150, 150),
    Pink => (255, 0, 255),
    Gold => (255, 204, 0),
    Yellow => (255, 255, 0),
    BrightGreen => (0, 255, 0),
    Turquoise => (0, 255, 255),
    DarkRed => (128, 0, 0),
    SkyBlue => (0, 204, 255),
    Plum => (153, 51, 102),
    Grey25Percent => (192, 192, 192),
    Rose => (255, 153, 204),
    LightYellow => (255, 255, 153),
    LightGreen => (204, 255, 204),
    LightTurquoise => (204, 255, 255),
    PaleBlue => (153, 204, 255),
    Lavender => (204, 153, 255),
    White => (255, 255, 255),
    CornflowerBlue => (153, 153, 255),
    LemonChiffon => (255, 255, 204),
    Maroon => (127, 0, 0),
    Orchid => (102, 0, 102),
    Coral => (255, 128, 128),
    RoyalBlue => (0, 102, 204),
    LightCornflowerBlue => (204, 204, 255),
    Tan => (255, 204, 153),
}

impl From<Colors> for Color {
    fn from(colors: Colors) -> Self {
        colors.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette() {
        assert_eq!(Colors::ALL.len(), 47);
        assert_eq!(Color::from(Colors::Red), Color::RED);
        assert_eq!(Colors::Tan.color().to_rgb_u32(), Some(0xFFCC99));
        assert_eq!(Colors::SeaGreen.name(), "SeaGreen");
    }
}
