// startpage-cli/src/palette.rs
use ratatui::style::Color;

/// Colors for one page theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    /// Border of the focused component
    pub focus: Color,
    /// Border of every other component
    pub unfocus: Color,
    /// Headings and titles
    pub heading: Color,
    /// Body text
    pub text: Color,
    /// Links and buttons
    pub link: Color,
    /// Placeholders and empty containers
    pub muted: Color,
    /// Page background
    pub background: Color,
}

pub const LIGHT_PALETTE: ColorPalette = ColorPalette {
    focus: Color::Blue,
    unfocus: Color::Gray,
    heading: Color::Black,
    text: Color::Black,
    link: Color::Blue,
    muted: Color::DarkGray,
    background: Color::White,
};

pub const DARK_PALETTE: ColorPalette = ColorPalette {
    focus: Color::Yellow,
    unfocus: Color::DarkGray,
    heading: Color::White,
    text: Color::Gray,
    link: Color::Cyan,
    muted: Color::DarkGray,
    background: Color::Black,
};

/// Palette for the applied theme name. Anything but `dark` is light.
pub fn palette_for(theme: Option<&str>) -> ColorPalette {
    match theme {
        Some("dark") => DARK_PALETTE,
        _ => LIGHT_PALETTE,
    }
}

/// Focus or unfocus color from palette
pub fn focus_color(focused: bool, palette: ColorPalette) -> Color {
    if focused {
        palette.focus
    } else {
        palette.unfocus
    }
}
