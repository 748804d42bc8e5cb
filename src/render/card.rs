//! Layout compositor: the fixed 1200x630 Open-Graph card as a declarative
//! draw-op list.
//!
//! Composition is pure data assembly; no I/O and no shaping happens here.
//! The rasterizer consumes the ops in order (painter's algorithm).

use kurbo::{Point, Rect};

use crate::ephemeris::ReadingSummary;

/// Fixed card width in pixels.
pub const CARD_WIDTH: u32 = 1200;
/// Fixed card height in pixels.
pub const CARD_HEIGHT: u32 = 630;

const BACKGROUND: Rgba8 = Rgba8::opaque(0x12, 0x0f, 0x1d);
const BORDER: Rgba8 = Rgba8::opaque(0x3d, 0x36, 0x54);
const LABEL: Rgba8 = Rgba8::opaque(0xc9, 0xa2, 0x4b);
const TITLE: Rgba8 = Rgba8::opaque(0xef, 0xec, 0xf6);
const SUBTITLE: Rgba8 = Rgba8::opaque(0x8a, 0x84, 0x96);

const BORDER_INSET: f64 = 20.0;
const BORDER_WIDTH: f64 = 2.0;
const COLUMN_X: f64 = 64.0;
const COLUMN_WIDTH: f32 = 520.0;

/// Fallback title when the upstream reading is absent.
const FALLBACK_TITLE: &str = "The daily transmission";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Which of the two bundled typefaces a text op uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontRole {
    Display,
    Body,
}

/// One drawable element of the card, executed in order by the rasterizer.
#[derive(Clone, Debug)]
pub enum CardOp {
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    Text {
        text: String,
        font: FontRole,
        size_px: f32,
        color: Rgba8,
        origin: Point,
        max_width_px: Option<f32>,
    },
    /// The chart composer's SVG document, drawn at its natural size.
    Chart {
        svg: String,
        origin: Point,
    },
}

/// Assemble the card: background, inset border, left text column, right
/// chart. The reading is optional; its absence falls back to the site
/// tagline so the card never renders with an empty title block.
pub fn compose_card(
    date_label: &str,
    reading: Option<&ReadingSummary>,
    chart_svg: String,
) -> Vec<CardOp> {
    let w = CARD_WIDTH as f64;
    let h = CARD_HEIGHT as f64;
    let title = reading
        .map(|r| r.title.as_str())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(FALLBACK_TITLE);

    let mut ops = vec![CardOp::FillRect {
        rect: Rect::new(0.0, 0.0, w, h),
        color: BACKGROUND,
    }];
    ops.extend(inset_border(w, h));

    ops.push(CardOp::Text {
        text: "VOIDWIRE".to_string(),
        font: FontRole::Display,
        size_px: 30.0,
        color: LABEL,
        origin: Point::new(COLUMN_X, 72.0),
        max_width_px: None,
    });
    ops.push(CardOp::Text {
        text: title.to_string(),
        font: FontRole::Display,
        size_px: 54.0,
        color: TITLE,
        origin: Point::new(COLUMN_X, 150.0),
        max_width_px: Some(COLUMN_WIDTH),
    });
    ops.push(CardOp::FillRect {
        rect: Rect::new(COLUMN_X, 468.0, COLUMN_X + 180.0, 471.0),
        color: LABEL,
    });
    ops.push(CardOp::Text {
        text: date_label.to_string(),
        font: FontRole::Body,
        size_px: 26.0,
        color: SUBTITLE,
        origin: Point::new(COLUMN_X, 494.0),
        max_width_px: Some(COLUMN_WIDTH),
    });

    let chart = crate::chart::wheel::CHART_SIZE as f64;
    ops.push(CardOp::Chart {
        svg: chart_svg,
        origin: Point::new(w - chart - 60.0, (h - chart) / 2.0),
    });

    ops
}

fn inset_border(w: f64, h: f64) -> [CardOp; 4] {
    let i = BORDER_INSET;
    let b = BORDER_WIDTH;
    [
        CardOp::FillRect {
            rect: Rect::new(i, i, w - i, i + b),
            color: BORDER,
        },
        CardOp::FillRect {
            rect: Rect::new(i, h - i - b, w - i, h - i),
            color: BORDER,
        },
        CardOp::FillRect {
            rect: Rect::new(i, i, i + b, h - i),
            color: BORDER,
        },
        CardOp::FillRect {
            rect: Rect::new(w - i - b, i, w - i, h - i),
            color: BORDER,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::wheel::compose_wheel;
    use crate::ephemeris::EphemerisSnapshot;

    fn text_ops(ops: &[CardOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                CardOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn card_includes_title_subtitle_and_chart() {
        let reading = ReadingSummary {
            title: "Mercury stations direct".to_string(),
            body: None,
        };
        let ops = compose_card(
            "February 19, 2026",
            Some(&reading),
            compose_wheel(&EphemerisSnapshot::default()),
        );
        let texts = text_ops(&ops);
        assert!(texts.contains(&"Mercury stations direct"));
        assert!(texts.contains(&"February 19, 2026"));
        assert!(texts.contains(&"VOIDWIRE"));
        assert!(
            ops.iter()
                .any(|op| matches!(op, CardOp::Chart { svg, .. } if svg.starts_with("<svg")))
        );
    }

    #[test]
    fn absent_reading_falls_back_to_tagline() {
        let ops = compose_card("February 19, 2026", None, String::new());
        assert!(text_ops(&ops).contains(&FALLBACK_TITLE));
    }

    #[test]
    fn blank_title_falls_back_to_tagline() {
        let reading = ReadingSummary {
            title: "   ".to_string(),
            body: None,
        };
        let ops = compose_card("February 19, 2026", Some(&reading), String::new());
        assert!(text_ops(&ops).contains(&FALLBACK_TITLE));
    }

    #[test]
    fn background_covers_full_canvas() {
        let ops = compose_card("x", None, String::new());
        let CardOp::FillRect { rect, .. } = &ops[0] else {
            panic!("first op must be the background fill");
        };
        assert_eq!(rect.width(), CARD_WIDTH as f64);
        assert_eq!(rect.height(), CARD_HEIGHT as f64);
    }
}
