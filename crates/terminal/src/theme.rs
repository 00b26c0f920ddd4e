use portal_config::ThemeConfig;
use ratatui::style::Color;

/// Colors for one frame, parsed once from the `[theme]` section.
///
/// Invalid hex strings fall back to the built-in palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub accent:     Color,
    pub tab_fill:   Color,
}

impl Palette {
    pub const DEFAULT: Self = Self {
        background: Color::Rgb(0x20, 0x20, 0x20),
        foreground: Color::Rgb(0xff, 0xff, 0xff),
        accent:     Color::Rgb(0x1a, 0x1a, 0x1a),
        tab_fill:   Color::Rgb(0x97, 0x96, 0x97),
    };

    /// Backlight off: everything black except a faint foreground.
    pub const DARK: Self = Self {
        background: Color::Black,
        foreground: Color::DarkGray,
        accent:     Color::Black,
        tab_fill:   Color::Black,
    };

    pub fn from_config(cfg: &ThemeConfig) -> Self {
        Self {
            background: from_hex(&cfg.background).unwrap_or(Self::DEFAULT.background),
            foreground: from_hex(&cfg.foreground).unwrap_or(Self::DEFAULT.foreground),
            accent:     from_hex(&cfg.accent).unwrap_or(Self::DEFAULT.accent),
            tab_fill:   from_hex(&cfg.tab_fill).unwrap_or(Self::DEFAULT.tab_fill),
        }
    }

    /// Palette for a backlight level in `[0, 1]`.
    #[must_use]
    pub fn at_brightness(self, level: f32) -> Self {
        if level <= 0.0 {
            Self::DARK
        } else {
            self
        }
    }
}

/// Parse `#RRGGBB` (the leading `#` is optional).
pub fn from_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(byte(0)?, byte(2)?, byte(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(from_hex("#979697"), Some(Color::Rgb(0x97, 0x96, 0x97)));
        assert_eq!(from_hex("ff0080"), Some(Color::Rgb(0xff, 0x00, 0x80)));
    }

    #[test]
    fn rejects_bad_hex() {
        assert_eq!(from_hex("#fff"), None);
        assert_eq!(from_hex("#gg0000"), None);
        assert_eq!(from_hex("#ffééf"), None);
    }

    #[test]
    fn default_config_matches_builtin_palette() {
        assert_eq!(Palette::from_config(&ThemeConfig::default()), Palette::DEFAULT);
    }

    #[test]
    fn invalid_entries_fall_back() {
        let cfg = ThemeConfig {
            accent: "purple".into(),
            ..ThemeConfig::default()
        };
        assert_eq!(Palette::from_config(&cfg).accent, Palette::DEFAULT.accent);
    }

    #[test]
    fn dark_when_backlight_off() {
        assert_eq!(Palette::DEFAULT.at_brightness(0.0), Palette::DARK);
        assert_eq!(Palette::DEFAULT.at_brightness(1.0), Palette::DEFAULT);
    }
}
