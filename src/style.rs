//! Display style of a highlighted run.
//!
//! A theme maps each token kind to a [`Style`]; every run of a styled line
//! carries the style it was painted with. Unset colors leave the choice to
//! whatever paints the line.
//!
//! ```
//! use incremental_highlight::{Rgba, Style, TextAttributes};
//!
//! let keyword = Style::fg(Rgba::from_hex("#fb4934").unwrap()).with_bold();
//! assert!(keyword.attributes.contains(TextAttributes::BOLD));
//! assert_eq!(keyword.bg, None);
//! ```

use crate::color::Rgba;
use bitflags::bitflags;

bitflags! {
    /// Font attributes a theme can request for a token kind.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextAttributes: u8 {
        const BOLD      = 0x01;
        const ITALIC    = 0x02;
        const UNDERLINE = 0x04;
    }
}

/// Colors plus font attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub attributes: TextAttributes,
}

impl Style {
    /// No colors, no attributes.
    pub const NONE: Self = Self {
        fg: None,
        bg: None,
        attributes: TextAttributes::empty(),
    };

    /// Foreground color only.
    #[must_use]
    pub const fn fg(color: Rgba) -> Self {
        Self {
            fg: Some(color),
            ..Self::NONE
        }
    }

    /// Bold with default colors.
    #[must_use]
    pub const fn bold() -> Self {
        Self::NONE.with_attributes(TextAttributes::BOLD)
    }

    #[must_use]
    pub const fn with_fg(self, color: Rgba) -> Self {
        Self {
            fg: Some(color),
            ..self
        }
    }

    #[must_use]
    pub const fn with_bg(self, color: Rgba) -> Self {
        Self {
            bg: Some(color),
            ..self
        }
    }

    /// Add attributes to the ones already set.
    #[must_use]
    pub const fn with_attributes(self, attrs: TextAttributes) -> Self {
        Self {
            attributes: self.attributes.union(attrs),
            ..self
        }
    }

    #[must_use]
    pub const fn with_bold(self) -> Self {
        self.with_attributes(TextAttributes::BOLD)
    }

    #[must_use]
    pub const fn with_italic(self) -> Self {
        self.with_attributes(TextAttributes::ITALIC)
    }

    #[must_use]
    pub const fn with_underline(self) -> Self {
        self.with_attributes(TextAttributes::UNDERLINE)
    }

    /// True when nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attributes.is_empty()
    }
}
