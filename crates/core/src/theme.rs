//! Deck-wide typography and color palette.

use crate::units::Rgb;

/// Body typeface; covers both CJK and Latin glyphs.
pub const BODY_FONT: &str = "Microsoft YaHei";

/// Monospace typeface for code listings.
pub const CODE_FONT: &str = "Consolas";

pub const PRIMARY: Rgb = Rgb::new(0, 51, 102);
pub const ACCENT: Rgb = Rgb::new(0, 102, 204);
pub const HIGHLIGHT: Rgb = Rgb::new(200, 100, 0);

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const TEXT_DARK: Rgb = Rgb::new(50, 50, 50);
pub const TEXT_BODY: Rgb = Rgb::new(60, 60, 60);
pub const TEXT_MUTED: Rgb = Rgb::new(80, 80, 80);
pub const TEXT_SUBTLE: Rgb = Rgb::new(100, 100, 100);
pub const TEXT_SOFT: Rgb = Rgb::new(120, 120, 120);
pub const TEXT_FAINT: Rgb = Rgb::new(150, 150, 150);

pub const RULE: Rgb = Rgb::new(200, 200, 200);
pub const PANEL_NEUTRAL: Rgb = Rgb::new(245, 245, 245);
pub const PANEL_ACCENT: Rgb = Rgb::new(225, 240, 255);
pub const CARD_FILL: Rgb = Rgb::new(248, 248, 248);
pub const CARD_BORDER: Rgb = Rgb::new(220, 220, 220);
pub const PANEL_WARM: Rgb = Rgb::new(255, 250, 240);
pub const PANEL_WARM_BORDER: Rgb = Rgb::new(200, 150, 100);
pub const PANEL_COOL: Rgb = Rgb::new(240, 248, 255);
pub const PANEL_COOL_BORDER: Rgb = Rgb::new(200, 220, 240);

/// Terminal mock-up colors.
pub const TERMINAL: Rgb = Rgb::new(40, 44, 52);
pub const TERMINAL_PROMPT: Rgb = Rgb::new(0, 255, 0);

/// Caption shown in every slide footer.
pub const FOOTER_CAPTION: &str = "C语言代码相似度检测系统";
