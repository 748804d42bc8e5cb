//! Voidwire is the rendering back-end of the VOIDWIRE daily astrology site.
//!
//! It turns a calendar date into shareable artifacts by consuming the upstream
//! content/ephemeris API and rendering locally:
//!
//! 1. **Fetch**: reading + ephemeris for the date, in parallel, best-effort
//! 2. **Compose**: ephemeris -> SVG chart wheel ([`chart`])
//! 3. **Lay out**: fixed 1200x630 Open-Graph card as declarative draw ops
//! 4. **Rasterize**: draw ops -> PNG via `vello_cpu` + `resvg` + `parley`
//! 5. **Serve**: `GET /og/<date>.png` and `GET /feed.xml` over axum
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Degrade, don't fail**: a missing reading or empty ephemeris still
//!   produces a full-size card; only asset misconfiguration and render faults
//!   surface as errors.
//! - **No IO in renderers**: fonts are loaded once per process and injected;
//!   composition and rasterization are pure CPU work.
#![forbid(unsafe_code)]

pub mod assets;
pub mod chart;
pub mod config;
pub mod ephemeris;
pub mod feed;
pub mod foundation;
pub mod render;
pub mod server;
pub mod upstream;

pub use crate::assets::fonts::{FontAssets, FontStore};
pub use crate::chart::wheel::{CHART_SIZE, compose_wheel};
pub use crate::config::ServeConfig;
pub use crate::ephemeris::{
    Aspect, AspectKind, BodyPosition, EphemerisSnapshot, ReadingSummary, ZodiacSign,
};
pub use crate::foundation::error::{VoidwireError, VoidwireResult};
pub use crate::render::card::{CARD_HEIGHT, CARD_WIDTH, CardOp, compose_card};
pub use crate::render::raster::rasterize_card;
pub use crate::upstream::{Fetched, UpstreamClient};
