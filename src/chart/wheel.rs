//! Chart composer: deterministic `EphemerisSnapshot` -> SVG wheel document.
//!
//! The output is a self-contained SVG at a fixed pixel size, embeddable as an
//! image source. Twelve sign segments are always drawn; aspect lines and
//! planet markers appear only for the data present, so an empty snapshot
//! still yields the static ring and background.

use std::fmt::Write as _;

use crate::chart::geometry::{declutter_longitudes, wheel_point};
use crate::ephemeris::{AspectKind, EphemerisSnapshot, ZodiacSign};

/// Fixed edge length of the square wheel document, in pixels.
pub const CHART_SIZE: u32 = 520;

const CENTER: f64 = CHART_SIZE as f64 / 2.0;
const RING_OUTER: f64 = 248.0;
const RING_INNER: f64 = 208.0;
const MARKER_RADIUS: f64 = 182.0;
const ASPECT_RADIUS: f64 = 156.0;

const BACKGROUND: &str = "#120f1d";
const RING_STROKE: &str = "#3d3654";
const NEUTRAL_TINT: &str = "#8a8496";
const MARKER_STROKE: &str = "#0c0a14";
const RETROGRADE_RING: &str = "#e8d97c";

/// Static sign -> tint table, grouped by element.
fn sign_tint(sign: ZodiacSign) -> &'static str {
    match sign {
        // fire
        ZodiacSign::Aries | ZodiacSign::Leo | ZodiacSign::Sagittarius => "#b5544a",
        // earth
        ZodiacSign::Taurus | ZodiacSign::Virgo | ZodiacSign::Capricorn => "#6f8a53",
        // air
        ZodiacSign::Gemini | ZodiacSign::Libra | ZodiacSign::Aquarius => "#c9a24b",
        // water
        ZodiacSign::Cancer | ZodiacSign::Scorpio | ZodiacSign::Pisces => "#4a7a9b",
    }
}

struct AspectStyle {
    color: &'static str,
    width: f64,
    dash: Option<&'static str>,
}

fn aspect_style(kind: AspectKind) -> AspectStyle {
    match kind {
        AspectKind::Conjunction => AspectStyle {
            color: "#e8d97c",
            width: 2.0,
            dash: None,
        },
        AspectKind::Opposition => AspectStyle {
            color: "#d06a5e",
            width: 2.0,
            dash: None,
        },
        AspectKind::Trine => AspectStyle {
            color: "#7db58a",
            width: 1.6,
            dash: None,
        },
        AspectKind::Square => AspectStyle {
            color: "#c2596b",
            width: 1.6,
            dash: Some("6 3"),
        },
        AspectKind::Sextile => AspectStyle {
            color: "#6e9fc4",
            width: 1.2,
            dash: Some("4 3"),
        },
        AspectKind::Quincunx => AspectStyle {
            color: "#9a86b8",
            width: 1.0,
            dash: Some("2 4"),
        },
        AspectKind::Other => AspectStyle {
            color: NEUTRAL_TINT,
            width: 1.0,
            dash: None,
        },
    }
}

/// Aspect line opacity: tighter orbs render more prominently, floored for
/// minimum visibility.
pub fn aspect_opacity(orb_deg: f64) -> f64 {
    (0.7 * (1.0 - orb_deg / 10.0)).clamp(0.15, 0.7)
}

/// Marker radius per named body; unlisted bodies get the default.
fn marker_radius(body: &str) -> f64 {
    match body.to_ascii_lowercase().as_str() {
        "sun" => 12.0,
        "moon" => 11.0,
        "jupiter" | "saturn" => 9.5,
        "mercury" | "venus" | "mars" => 8.5,
        _ => 7.5,
    }
}

fn body_glyph(body: &str) -> Option<char> {
    match body.to_ascii_lowercase().as_str() {
        "sun" => Some('\u{2609}'),
        "moon" => Some('\u{263D}'),
        "mercury" => Some('\u{263F}'),
        "venus" => Some('\u{2640}'),
        "mars" => Some('\u{2642}'),
        "jupiter" => Some('\u{2643}'),
        "saturn" => Some('\u{2644}'),
        "uranus" => Some('\u{2645}'),
        "neptune" => Some('\u{2646}'),
        "pluto" => Some('\u{2647}'),
        _ => None,
    }
}

/// Build the wheel SVG for one snapshot.
pub fn compose_wheel(snapshot: &EphemerisSnapshot) -> String {
    let mut svg = String::with_capacity(8 * 1024);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
        s = CHART_SIZE
    );

    let _ = write!(
        svg,
        r#"<circle cx="{c}" cy="{c}" r="{r}" fill="{bg}"/>"#,
        c = CENTER,
        r = RING_OUTER + 6.0,
        bg = BACKGROUND
    );

    push_sign_segments(&mut svg);
    push_aspect_lines(&mut svg, snapshot);
    push_markers(&mut svg, snapshot);

    // ring outlines on top of the segments
    for r in [RING_OUTER, RING_INNER, ASPECT_RADIUS] {
        let _ = write!(
            svg,
            r#"<circle cx="{c}" cy="{c}" r="{r}" fill="none" stroke="{st}" stroke-width="1"/>"#,
            c = CENTER,
            st = RING_STROKE
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Twelve fixed 30-degree segments, drawn regardless of data.
fn push_sign_segments(svg: &mut String) {
    for (i, sign) in ZodiacSign::ALL.iter().enumerate() {
        let start = i as f64 * 30.0;
        let end = start + 30.0;
        let o0 = wheel_point(CENTER, CENTER, start, RING_OUTER);
        let o1 = wheel_point(CENTER, CENTER, end, RING_OUTER);
        let i1 = wheel_point(CENTER, CENTER, end, RING_INNER);
        let i0 = wheel_point(CENTER, CENTER, start, RING_INNER);
        // Longitude increases counter-clockwise on screen, so the outer arc
        // sweeps against SVG's positive-angle direction.
        let _ = write!(
            svg,
            r#"<path d="M {:.2} {:.2} A {ro} {ro} 0 0 0 {:.2} {:.2} L {:.2} {:.2} A {ri} {ri} 0 0 1 {:.2} {:.2} Z" fill="{tint}" fill-opacity="0.55"/>"#,
            o0.x,
            o0.y,
            o1.x,
            o1.y,
            i1.x,
            i1.y,
            i0.x,
            i0.y,
            ro = RING_OUTER,
            ri = RING_INNER,
            tint = sign_tint(*sign)
        );
    }
}

fn push_aspect_lines(svg: &mut String, snapshot: &EphemerisSnapshot) {
    for aspect in &snapshot.aspects {
        // drawn only when both endpoints resolve in the position map
        let (Some(a), Some(b)) = (
            snapshot.position(&aspect.body_a),
            snapshot.position(&aspect.body_b),
        ) else {
            continue;
        };
        let pa = wheel_point(CENTER, CENTER, a.longitude_deg, ASPECT_RADIUS);
        let pb = wheel_point(CENTER, CENTER, b.longitude_deg, ASPECT_RADIUS);
        let style = aspect_style(aspect.kind);
        let dash = style
            .dash
            .map(|d| format!(r#" stroke-dasharray="{d}""#))
            .unwrap_or_default();
        let _ = write!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}" stroke-opacity="{:.3}"{}/>"#,
            pa.x,
            pa.y,
            pb.x,
            pb.y,
            style.color,
            style.width,
            aspect_opacity(aspect.orb_deg),
            dash
        );
    }
}

fn push_markers(svg: &mut String, snapshot: &EphemerisSnapshot) {
    let mut bodies: Vec<(&str, &crate::ephemeris::BodyPosition)> = snapshot
        .positions
        .iter()
        .map(|(name, pos)| (name.as_str(), pos))
        .collect();
    bodies.sort_by(|a, b| {
        a.1.longitude_deg
            .partial_cmp(&b.1.longitude_deg)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut longitudes: Vec<f64> = bodies.iter().map(|(_, pos)| pos.longitude_deg).collect();
    declutter_longitudes(&mut longitudes);

    for ((name, pos), display_lon) in bodies.iter().zip(longitudes.iter()) {
        let p = wheel_point(CENTER, CENTER, *display_lon, MARKER_RADIUS);
        let r = marker_radius(name);
        let tint = pos.sign.map(sign_tint).unwrap_or(NEUTRAL_TINT);

        let _ = write!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{r}" fill="{tint}" stroke="{MARKER_STROKE}" stroke-width="1.5"/>"#,
            p.x, p.y
        );
        if pos.retrograde {
            let _ = write!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.1}" fill="none" stroke="{RETROGRADE_RING}" stroke-width="1"/>"#,
                p.x,
                p.y,
                r + 3.0
            );
        }
        if let Some(glyph) = body_glyph(name) {
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" fill="{MARKER_STROKE}" text-anchor="middle" dominant-baseline="central">{glyph}</text>"#,
                p.x,
                p.y,
                r * 1.3
            );
        }
    }
}
