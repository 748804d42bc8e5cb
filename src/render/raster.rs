//! Rasterizer: card draw ops -> PNG bytes.
//!
//! CPU-bound and synchronous. Paths fill through `vello_cpu`, text shapes
//! through Parley against the two injected typefaces, and the chart SVG is
//! rasterized with `resvg` and composited as an image paint.

use std::io::Cursor;
use std::sync::Arc;

use crate::assets::fonts::FontAssets;
use crate::foundation::error::{VoidwireError, VoidwireResult};
use crate::render::card::{CARD_HEIGHT, CARD_WIDTH, CardOp, FontRole, Rgba8};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine};

/// Rasterize the composed card at its fixed size and encode it as PNG.
#[tracing::instrument(skip_all, fields(ops = ops.len()))]
pub fn rasterize_card(ops: &[CardOp], fonts: &FontAssets) -> VoidwireResult<Vec<u8>> {
    let width: u16 = CARD_WIDTH
        .try_into()
        .map_err(|_| VoidwireError::render("card width exceeds u16"))?;
    let height: u16 = CARD_HEIGHT
        .try_into()
        .map_err(|_| VoidwireError::render("card height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    let mut engine = TextLayoutEngine::new(fonts)?;

    for op in ops {
        draw_op(&mut ctx, &mut engine, op, fonts)?;
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    let rgba = unpremultiply_rgba8(pixmap.data_as_u8_slice());
    encode_png(&rgba, CARD_WIDTH, CARD_HEIGHT)
}

fn draw_op(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut TextLayoutEngine,
    op: &CardOp,
    fonts: &FontAssets,
) -> VoidwireResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        CardOp::FillRect { rect, color } => {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(paint_color(*color));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                rect.x0, rect.y0, rect.x1, rect.y1,
            ));
            Ok(())
        }
        CardOp::Text {
            text,
            font,
            size_px,
            color,
            origin,
            max_width_px,
        } => {
            let font_bytes: &Arc<Vec<u8>> = match font {
                FontRole::Display => &fonts.display,
                FontRole::Body => &fonts.body,
            };
            let layout = engine.layout_plain(
                text,
                *font,
                *size_px,
                TextBrushRgba8 {
                    r: color.r,
                    g: color.g,
                    b: color.b,
                    a: color.a,
                },
                *max_width_px,
            )?;

            let font_data = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
                0,
            );
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font_data)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
            Ok(())
        }
        CardOp::Chart { svg, origin } => {
            if svg.is_empty() {
                return Ok(());
            }
            let (pixmap, w, h) = rasterize_svg(svg, fonts)?;
            let paint = vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            };
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w as f64, h as f64));
            Ok(())
        }
    }
}

/// Parse and rasterize an SVG document at its natural size.
///
/// The fontdb is seeded with both bundled typefaces and the body face is
/// registered as the generic sans-serif family, so `<text>` nodes in the
/// wheel resolve without touching system fonts.
fn rasterize_svg(
    svg: &str,
    fonts: &FontAssets,
) -> VoidwireResult<(vello_cpu::Pixmap, u32, u32)> {
    let mut fontdb = resvg::usvg::fontdb::Database::new();
    fontdb.load_font_data(fonts.body.as_ref().clone());
    fontdb.load_font_data(fonts.display.as_ref().clone());
    let sans_family = fontdb
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(family, _)| family.clone());
    if let Some(family) = sans_family {
        fontdb.set_sans_serif_family(family);
    }

    let options = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| VoidwireError::render(format!("parse chart svg: {e}")))?;

    let size = tree.size();
    let w = (size.width().ceil() as u32).max(1);
    let h = (size.height().ceil() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| VoidwireError::render("failed to allocate svg pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );

    let cpu_pixmap = premul_bytes_to_pixmap(pixmap.data(), w, h)?;
    Ok((cpu_pixmap, w, h))
}

fn paint_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> VoidwireResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VoidwireError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VoidwireError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(VoidwireError::render("svg pixmap byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premul.len());
    for px in premul.chunks_exact(4) {
        let a = px[3];
        if a == 0 || a == 255 {
            out.extend_from_slice(px);
        } else {
            let af = a as u32;
            let un = |c: u8| -> u8 { ((c as u32 * 255 + af / 2) / af).min(255) as u8 };
            out.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), a]);
        }
    }
    out
}

fn encode_png(rgba: &[u8], width: u32, height: u32) -> VoidwireResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba.to_vec())
        .ok_or_else(|| VoidwireError::render("raster byte length mismatch"))?;
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| VoidwireError::render(format!("png encode: {e}")))?;
    Ok(bytes)
}
