//! Style maps from token kinds to display styles.
//!
//! Lookups walk the token-kind hierarchy: a theme only needs entries for the
//! kinds it wants to distinguish, everything else inherits from the nearest
//! mapped ancestor and finally from the theme's default style.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::highlight::token::TokenKind;
use crate::style::Style;
use std::collections::HashMap;

const fn hex(rgb: u32) -> Rgba {
    Rgba::from_packed_rgb(rgb)
}

/// A syntax highlighting theme that maps token kinds to styles.
#[derive(Clone, Debug)]
pub struct Theme {
    name: String,
    styles: [Option<Style>; TokenKind::COUNT],
    default_style: Style,
    background: Rgba,
    foreground: Rgba,
}

impl Theme {
    /// Create an empty theme: every kind renders with the default style.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: [None; TokenKind::COUNT],
            default_style: Style::default(),
            background: Rgba::BLACK,
            foreground: Rgba::WHITE,
        }
    }

    /// Theme name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Style for a token kind, inherited from the nearest mapped ancestor.
    #[must_use]
    pub fn style_for(&self, kind: TokenKind) -> Style {
        kind.lineage()
            .find_map(|k| self.styles[k.as_usize()])
            .unwrap_or(self.default_style)
    }

    /// Style mapped for exactly this kind, without inheritance.
    #[must_use]
    pub fn mapped_style(&self, kind: TokenKind) -> Option<Style> {
        self.styles[kind.as_usize()]
    }

    /// Theme default style.
    #[must_use]
    pub const fn default_style(&self) -> Style {
        self.default_style
    }

    /// Set a style for a token kind.
    pub fn set_style(&mut self, kind: TokenKind, style: Style) -> &mut Self {
        self.styles[kind.as_usize()] = Some(style);
        self
    }

    /// Builder-style style setter.
    #[must_use]
    pub fn with_style(mut self, kind: TokenKind, style: Style) -> Self {
        self.set_style(kind, style);
        self
    }

    /// Builder-style default style setter.
    #[must_use]
    pub fn with_default_style(mut self, style: Style) -> Self {
        self.default_style = style;
        self
    }

    /// Builder-style background setter.
    #[must_use]
    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    /// Builder-style foreground setter; also the default style's color.
    #[must_use]
    pub fn with_foreground(mut self, color: Rgba) -> Self {
        self.foreground = color;
        self.default_style.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn background(&self) -> Rgba {
        self.background
    }

    #[must_use]
    pub const fn foreground(&self) -> Rgba {
        self.foreground
    }

    /// Dark theme inspired by popular editor palettes.
    #[must_use]
    pub fn dark() -> Self {
        let comment = hex(0x62_72_a4);
        let keyword = hex(0xff_79_c6);
        let types = hex(0x8b_e9_fd);
        let string = hex(0xf1_fa_8c);
        let number = hex(0xbd_93_f9);
        let function = hex(0x50_fa_7b);

        Self::new("Dark")
            .with_background(hex(0x28_2a_36))
            .with_foreground(hex(0xf8_f8_f2))
            .with_style(TokenKind::Keyword, Style::fg(keyword))
            .with_style(TokenKind::KeywordType, Style::fg(types).with_italic())
            .with_style(TokenKind::Type, Style::fg(types))
            .with_style(TokenKind::Function, Style::fg(function))
            .with_style(TokenKind::String, Style::fg(string))
            .with_style(TokenKind::StringEscape, Style::fg(string).with_bold())
            .with_style(TokenKind::Number, Style::fg(number))
            .with_style(TokenKind::Constant, Style::fg(number))
            .with_style(TokenKind::Comment, Style::fg(comment).with_italic())
            .with_style(TokenKind::Attribute, Style::fg(function))
            .with_style(TokenKind::Operator, Style::fg(keyword))
            .with_style(TokenKind::Label, Style::fg(types))
            .with_style(TokenKind::Error, Style::fg(Rgba::RED).with_bold())
    }

    /// Light theme for bright environments.
    #[must_use]
    pub fn light() -> Self {
        let comment = hex(0x6a_73_7d);
        let keyword = hex(0xd7_3a_49);
        let types = hex(0x00_5c_c5);
        let function = hex(0x22_86_3a);

        Self::new("Light")
            .with_background(Rgba::WHITE)
            .with_foreground(hex(0x24_29_2e))
            .with_style(TokenKind::Keyword, Style::fg(keyword))
            .with_style(TokenKind::KeywordType, Style::fg(types))
            .with_style(TokenKind::Type, Style::fg(types))
            .with_style(TokenKind::Function, Style::fg(function))
            .with_style(TokenKind::String, Style::fg(hex(0x03_2f_62)))
            .with_style(TokenKind::Number, Style::fg(hex(0x6f_42_c1)))
            .with_style(TokenKind::Constant, Style::fg(hex(0x6f_42_c1)))
            .with_style(TokenKind::Comment, Style::fg(comment).with_italic())
            .with_style(TokenKind::Attribute, Style::fg(function))
            .with_style(TokenKind::Operator, Style::fg(keyword))
            .with_style(TokenKind::Error, Style::fg(Rgba::RED).with_underline())
    }

    /// Gruvbox dark, the default editor theme.
    #[must_use]
    pub fn gruvbox_dark() -> Self {
        let red = hex(0xfb_49_34);
        let green = hex(0xb8_bb_26);
        let yellow = hex(0xfa_bd_2f);
        let blue = hex(0x83_a5_98);
        let purple = hex(0xd3_86_9b);
        let aqua = hex(0x8e_c0_7c);
        let orange = hex(0xfe_80_19);
        let gray = hex(0x92_83_74);

        Self::new("Gruvbox-Dark")
            .with_background(hex(0x28_28_28))
            .with_foreground(hex(0xeb_db_b2))
            .with_style(TokenKind::Keyword, Style::fg(red))
            .with_style(TokenKind::KeywordType, Style::fg(yellow))
            .with_style(TokenKind::Type, Style::fg(yellow))
            .with_style(TokenKind::Function, Style::fg(green).with_bold())
            .with_style(TokenKind::Macro, Style::fg(aqua))
            .with_style(TokenKind::String, Style::fg(green))
            .with_style(TokenKind::Number, Style::fg(purple))
            .with_style(TokenKind::Constant, Style::fg(purple))
            .with_style(TokenKind::Comment, Style::fg(gray).with_italic())
            .with_style(TokenKind::Attribute, Style::fg(aqua))
            .with_style(TokenKind::Operator, Style::fg(orange))
            .with_style(TokenKind::Label, Style::fg(blue))
            .with_style(TokenKind::Error, Style::fg(red).with_bg(hex(0x3c_38_36)))
    }

    /// Fixed terminal palette: bright primaries on the terminal's own colors.
    #[must_use]
    pub fn terminal() -> Self {
        let gray = hex(0x88_88_88);
        let cyan = hex(0x00_ff_ff);
        let blue = hex(0x00_00_ff);
        let green = hex(0x00_ff_00);
        let orange = hex(0xff_88_00);

        Self::new("Terminal")
            .with_style(TokenKind::Whitespace, Style::fg(gray))
            .with_style(TokenKind::Comment, Style::fg(gray))
            .with_style(TokenKind::Attribute, Style::fg(cyan))
            .with_style(TokenKind::Keyword, Style::fg(blue))
            .with_style(TokenKind::KeywordType, Style::fg(cyan))
            .with_style(TokenKind::Operator, Style::fg(orange))
            .with_style(TokenKind::Function, Style::fg(green))
            .with_style(TokenKind::Type, Style::fg(green))
            .with_style(TokenKind::Decorator, Style::fg(gray))
            .with_style(TokenKind::Identifier, Style::NONE)
            .with_style(TokenKind::Constant, Style::fg(gray))
            .with_style(TokenKind::String, Style::fg(hex(0xff_ff_00)))
            .with_style(TokenKind::Number, Style::fg(blue))
            .with_style(TokenKind::Error, Style::fg(Rgba::RED))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::gruvbox_dark()
    }
}

/// Named themes with a current selection.
#[derive(Debug)]
pub struct ThemeRegistry {
    themes: HashMap<String, Theme>,
    current: String,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ThemeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            themes: HashMap::new(),
            current: String::new(),
        }
    }

    /// Create a registry with built-in themes ("gruvbox-dark" current).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Theme::gruvbox_dark());
        registry.register(Theme::dark());
        registry.register(Theme::light());
        registry.register(Theme::terminal());
        registry
    }

    /// Register a theme by name (case-insensitive). The first registered
    /// theme becomes current.
    pub fn register(&mut self, theme: Theme) {
        let key = theme.name.to_ascii_lowercase();
        if self.current.is_empty() {
            self.current.clone_from(&key);
        }
        self.themes.insert(key, theme);
    }

    /// Get a theme by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.get(&name.to_ascii_lowercase())
    }

    /// The current theme, `None` only for an empty registry.
    #[must_use]
    pub fn current(&self) -> Option<&Theme> {
        self.themes.get(&self.current)
    }

    /// Set the current theme.
    pub fn set_current(&mut self, name: &str) -> Result<&Theme> {
        let key = name.to_ascii_lowercase();
        match self.themes.get(&key) {
            Some(theme) => {
                self.current = key;
                Ok(theme)
            }
            None => Err(Error::UnknownTheme(name.to_string())),
        }
    }

    /// Registered theme names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_for_inherits_from_ancestors() {
        let theme = Theme::new("t")
            .with_style(TokenKind::Comment, Style::fg(Rgba::GREEN))
            .with_style(TokenKind::Keyword, Style::bold());
        assert_eq!(theme.style_for(TokenKind::CommentDoc), Style::fg(Rgba::GREEN));
        assert_eq!(theme.style_for(TokenKind::KeywordControl), Style::bold());
        assert_eq!(theme.mapped_style(TokenKind::CommentDoc), None);
    }

    #[test]
    fn style_for_falls_back_to_default() {
        let theme = Theme::new("t").with_foreground(Rgba::WHITE);
        assert_eq!(theme.style_for(TokenKind::Number), Style::fg(Rgba::WHITE));
        assert_eq!(theme.style_for(TokenKind::Text), theme.default_style());
    }

    #[test]
    fn exact_mapping_beats_parent() {
        let theme = Theme::dark();
        assert_ne!(
            theme.style_for(TokenKind::KeywordType),
            theme.style_for(TokenKind::Keyword)
        );
        assert_eq!(
            theme.style_for(TokenKind::KeywordControl),
            theme.style_for(TokenKind::Keyword)
        );
    }

    #[test]
    fn terminal_palette_colors() {
        let theme = Theme::terminal();
        assert_eq!(
            theme.style_for(TokenKind::String).fg,
            Rgba::from_hex("#FFFF00")
        );
        assert_eq!(theme.style_for(TokenKind::Error).fg, Some(Rgba::RED));
        assert!(theme.style_for(TokenKind::Text).is_empty());
    }

    #[test]
    fn registry_builtins_and_selection() {
        let mut registry = ThemeRegistry::with_builtins();
        assert_eq!(registry.current().map(Theme::name), Some("Gruvbox-Dark"));
        assert_eq!(
            registry.names(),
            vec!["dark", "gruvbox-dark", "light", "terminal"]
        );

        let light = registry.set_current("LIGHT").unwrap();
        assert_eq!(light.name(), "Light");
        assert_eq!(registry.current().map(Theme::name), Some("Light"));

        let err = registry.set_current("neon").unwrap_err();
        assert!(matches!(err, Error::UnknownTheme(ref n) if n == "neon"));
    }

    #[test]
    fn empty_registry_has_no_current() {
        let mut registry = ThemeRegistry::new();
        assert!(registry.current().is_none());
        registry.register(Theme::new("Only"));
        assert_eq!(registry.current().map(Theme::name), Some("Only"));
    }
}
