//! Parley-based text shaping for the card rasterizer.
//!
//! The card only ever draws with the two bundled typefaces, so both are
//! registered with Parley once at construction and layouts pick one by
//! [`FontRole`].

use crate::assets::fonts::FontAssets;
use crate::foundation::error::{VoidwireError, VoidwireResult};
use crate::render::card::FontRole;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Stateful helper for building Parley text layouts over the bundled faces.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    display_family: String,
    body_family: String,
}

impl TextLayoutEngine {
    pub fn new(fonts: &FontAssets) -> VoidwireResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let display_family = register_face(&mut font_ctx, &fonts.display)?;
        let body_family = register_face(&mut font_ctx, &fonts.body)?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            display_family,
            body_family,
        })
    }

    /// Shape and lay out plain text in one of the bundled faces.
    ///
    /// `max_width_px` enables line breaking and start alignment within that
    /// width; without it the text stays on one unbounded line.
    pub fn layout_plain(
        &mut self,
        text: &str,
        role: FontRole,
        size_px: f32,
        brush: TextBrushRgba8,
        max_width_px: Option<f32>,
    ) -> VoidwireResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(VoidwireError::render("text size_px must be finite and > 0"));
        }

        let family = match role {
            FontRole::Display => self.display_family.clone(),
            FontRole::Body => self.body_family.clone(),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        if let Some(w) = max_width_px {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }

        Ok(layout)
    }
}

fn register_face(font_ctx: &mut parley::FontContext, bytes: &[u8]) -> VoidwireResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| VoidwireError::render("no font families registered from font bytes"))?;
    let name = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| VoidwireError::render("registered font family has no name"))?;
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn bundled_fonts() -> FontAssets {
        FontAssets {
            display: Arc::new(std::fs::read("assets/fonts/display.ttf").unwrap()),
            body: Arc::new(std::fs::read("assets/fonts/body.ttf").unwrap()),
        }
    }

    #[test]
    fn layout_plain_shapes_nonempty_text() {
        let mut engine = TextLayoutEngine::new(&bundled_fonts()).unwrap();
        let layout = engine
            .layout_plain(
                "the stars incline",
                FontRole::Body,
                24.0,
                TextBrushRgba8 {
                    r: 255,
                    g: 255,
                    b: 255,
                    a: 255,
                },
                None,
            )
            .unwrap();
        assert!(layout.height() > 0.0);
        assert!(layout.lines().count() >= 1);
    }

    #[test]
    fn narrow_max_width_breaks_lines() {
        let mut engine = TextLayoutEngine::new(&bundled_fonts()).unwrap();
        let brush = TextBrushRgba8::default();
        let unbroken = engine
            .layout_plain(
                "a reading about very long titles",
                FontRole::Body,
                24.0,
                brush,
                None,
            )
            .unwrap();
        let broken = engine
            .layout_plain(
                "a reading about very long titles",
                FontRole::Body,
                24.0,
                brush,
                Some(120.0),
            )
            .unwrap();
        assert!(broken.lines().count() > unbroken.lines().count());
    }

    #[test]
    fn both_faces_resolve_after_construction() {
        let mut engine = TextLayoutEngine::new(&bundled_fonts()).unwrap();
        for role in [FontRole::Display, FontRole::Body] {
            let layout = engine
                .layout_plain("August", role, 20.0, TextBrushRgba8::default(), None)
                .unwrap();
            assert!(layout.height() > 0.0);
        }
    }

    #[test]
    fn rejects_non_positive_size() {
        let mut engine = TextLayoutEngine::new(&bundled_fonts()).unwrap();
        assert!(
            engine
                .layout_plain("x", FontRole::Body, 0.0, TextBrushRgba8::default(), None)
                .is_err()
        );
    }
}
