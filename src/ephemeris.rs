//! Wire-facing ephemeris and reading types.
//!
//! Everything here is request-scoped: snapshots are deserialized from the
//! upstream API, normalized at ingestion, and discarded once the card is
//! rendered. Normalization rules:
//!
//! - longitudes are wrapped into `[0, 360)` with `rem_euclid`
//! - sign names match the 12 canonical names case-insensitively; anything
//!   else is kept as "no sign" and tinted neutrally downstream
//! - aspect kinds outside the known set collapse to [`AspectKind::Other`]

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Case-insensitive match against the 12 canonical names.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(&lowered))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }

    /// Sign containing the given ecliptic longitude (30 degrees per sign).
    pub fn from_longitude(longitude_deg: f64) -> Self {
        let normalized = longitude_deg.rem_euclid(360.0);
        let idx = ((normalized / 30.0).floor() as usize).min(11);
        Self::ALL[idx]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
    Quincunx,
    /// Unrecognized wire value; rendered with the neutral default style.
    Other,
}

impl AspectKind {
    fn from_wire(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "conjunction" => AspectKind::Conjunction,
            "opposition" => AspectKind::Opposition,
            "trine" => AspectKind::Trine,
            "square" => AspectKind::Square,
            "sextile" => AspectKind::Sextile,
            "quincunx" | "inconjunct" => AspectKind::Quincunx,
            _ => AspectKind::Other,
        }
    }
}

impl<'de> Deserialize<'de> for AspectKind {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(AspectKind::from_wire(&raw))
    }
}

/// Position of one celestial body on the wheel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// `None` when the upstream sign string was not one of the 12 names.
    #[serde(deserialize_with = "lenient_sign", default)]
    pub sign: Option<ZodiacSign>,
    /// Ecliptic longitude in degrees, normalized to `[0, 360)`.
    #[serde(deserialize_with = "normalized_longitude", rename = "longitude")]
    pub longitude_deg: f64,
    #[serde(default, alias = "retrogradeFlag", alias = "retrograde_flag")]
    pub retrograde: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    #[serde(alias = "bodyA", alias = "body_a")]
    pub body_a: String,
    #[serde(alias = "bodyB", alias = "body_b")]
    pub body_b: String,
    #[serde(alias = "aspectType", alias = "aspect_type", alias = "type")]
    pub kind: AspectKind,
    #[serde(alias = "orbDegrees", alias = "orb_degrees", alias = "orb", default)]
    pub orb_deg: f64,
}

/// Per-date table of body positions and their aspects.
///
/// Both collections may be empty: the chart composer renders the static wheel
/// regardless of data, so an empty snapshot is valid input, not an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSnapshot {
    #[serde(default)]
    pub positions: BTreeMap<String, BodyPosition>,
    #[serde(default)]
    pub aspects: Vec<Aspect>,
}

impl EphemerisSnapshot {
    /// Look up a body position by name, case-insensitively.
    pub fn position(&self, body: &str) -> Option<&BodyPosition> {
        self.positions
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(body))
            .map(|(_, pos)| pos)
    }
}

/// Reading content for a date. The body is optional on the wire and the whole
/// record is optional per request (an upstream miss is non-fatal).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadingSummary {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// One page entry from the archive listing, consumed by the RSS feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    #[serde(alias = "dateContext")]
    pub date_context: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

fn lenient_sign<'de, D: Deserializer<'de>>(de: D) -> Result<Option<ZodiacSign>, D::Error> {
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.as_deref().and_then(ZodiacSign::from_name))
}

fn normalized_longitude<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    let raw = f64::deserialize(de)?;
    if !raw.is_finite() {
        return Ok(0.0);
    }
    Ok(raw.rem_euclid(360.0))
}
