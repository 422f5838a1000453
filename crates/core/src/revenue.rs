//! Per-episode ad-revenue estimation.
//!
//! A show sells up to three placements (pre-, mid- and post-roll). Each
//! placement carries a CPM rate, a flat spot cost and a slot count. The
//! estimate depends on the show's pricing model:
//!
//! - `spot`: `Σ spot_cost × slots`
//! - `cpm`:  `Σ downloads × slots / 1000 × cpm`
//! - `both`: the sum of the two.
//!
//! Every missing, negative or non-finite input counts as zero, so the
//! estimate is always a finite, non-negative number. This is a display
//! figure; billing uses integer cents elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fallback average downloads per episode when neither an override nor
/// measured analytics are available.
pub const DEFAULT_AVG_DOWNLOADS: f64 = 5000.0;

/// Impressions per CPM unit.
pub const IMPRESSIONS_PER_CPM: f64 = 1000.0;

/// Largest CPM or spot cost accepted on a rate card, in dollars.
pub const MAX_RATE: f64 = 1_000_000.0;

/// Largest downloads override accepted on a rate card.
pub const MAX_AVG_DOWNLOADS: f64 = 1_000_000_000.0;

// ---------------------------------------------------------------------------
// Pricing model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    #[default]
    Cpm,
    Spot,
    Both,
}

impl PricingModel {
    pub const ALL: [PricingModel; 3] = [Self::Cpm, Self::Spot, Self::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpm => "cpm",
            Self::Spot => "spot",
            Self::Both => "both",
        }
    }

    /// Parse a stored pricing model name.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid pricing model '{value}'. Must be one of: cpm, spot, both"
                ))
            })
    }

    pub fn includes_cpm(self) -> bool {
        matches!(self, Self::Cpm | Self::Both)
    }

    pub fn includes_spot(self) -> bool {
        matches!(self, Self::Spot | Self::Both)
    }
}

// ---------------------------------------------------------------------------
// Placements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    PreRoll,
    MidRoll,
    PostRoll,
}

impl Placement {
    pub const ALL: [Placement; 3] = [Self::PreRoll, Self::MidRoll, Self::PostRoll];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreRoll => "pre_roll",
            Self::MidRoll => "mid_roll",
            Self::PostRoll => "post_roll",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid placement '{value}'. Must be one of: pre_roll, mid_roll, post_roll"
                ))
            })
    }
}

/// Rate card for a single placement. Absent fields count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementRate {
    #[serde(default)]
    pub cpm: Option<f64>,
    #[serde(default)]
    pub spot_cost: Option<f64>,
    #[serde(default)]
    pub slots: Option<i32>,
}

/// A show's revenue configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSettings {
    #[serde(default)]
    pub pricing_model: PricingModel,
    #[serde(default)]
    pub pre_roll: PlacementRate,
    #[serde(default)]
    pub mid_roll: PlacementRate,
    #[serde(default)]
    pub post_roll: PlacementRate,
    /// Explicit average downloads per episode. Takes priority over analytics.
    #[serde(default)]
    pub avg_downloads_override: Option<f64>,
}

impl RevenueSettings {
    pub fn rate_for(&self, placement: Placement) -> &PlacementRate {
        match placement {
            Placement::PreRoll => &self.pre_roll,
            Placement::MidRoll => &self.mid_roll,
            Placement::PostRoll => &self.post_roll,
        }
    }
}

// ---------------------------------------------------------------------------
// Estimate output
// ---------------------------------------------------------------------------

/// Which input supplied the downloads figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadsSource {
    Override,
    Measured,
    Default,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacementEstimate {
    pub placement: Placement,
    pub slots: i32,
    pub spot_revenue: f64,
    pub cpm_revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueEstimate {
    pub pricing_model: PricingModel,
    pub downloads: f64,
    pub downloads_source: DownloadsSource,
    pub placements: Vec<PlacementEstimate>,
    /// Zero when the pricing model excludes spot pricing.
    pub spot_total: f64,
    /// Zero when the pricing model excludes CPM pricing.
    pub cpm_total: f64,
    pub total: f64,
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// Coerce an optional input to a finite, non-negative number.
fn sanitize(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

fn sanitize_slots(slots: Option<i32>) -> i32 {
    slots.unwrap_or(0).max(0)
}

/// Products of large finite inputs can still overflow to infinity.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// CPM revenue for one placement: `downloads × slots / 1000 × cpm`.
pub fn cpm_revenue(cpm: f64, slots: i32, downloads: f64) -> f64 {
    let cpm = sanitize(Some(cpm));
    let downloads = sanitize(Some(downloads));
    if cpm == 0.0 || slots <= 0 || downloads == 0.0 {
        return 0.0;
    }
    finite_or_zero(downloads / IMPRESSIONS_PER_CPM * slots as f64 * cpm)
}

/// Flat spot revenue for one placement: `spot_cost × slots`.
pub fn spot_revenue(spot_cost: f64, slots: i32) -> f64 {
    let spot_cost = sanitize(Some(spot_cost));
    if spot_cost == 0.0 || slots <= 0 {
        return 0.0;
    }
    finite_or_zero(spot_cost * slots as f64)
}

/// Pick the downloads figure: override, then measured average, then `fallback`.
pub fn resolve_downloads(
    override_value: Option<f64>,
    measured: Option<f64>,
    fallback: f64,
) -> (f64, DownloadsSource) {
    let over = sanitize(override_value);
    if over > 0.0 {
        return (over, DownloadsSource::Override);
    }
    let measured = sanitize(measured);
    if measured > 0.0 {
        return (measured, DownloadsSource::Measured);
    }
    (sanitize(Some(fallback)), DownloadsSource::Default)
}

/// Estimate revenue for a single episode.
///
/// `measured_downloads` is the analytics average for the show, if any;
/// `fallback_downloads` is normally [`DEFAULT_AVG_DOWNLOADS`].
pub fn estimate_episode(
    settings: &RevenueSettings,
    measured_downloads: Option<f64>,
    fallback_downloads: f64,
) -> RevenueEstimate {
    let (downloads, downloads_source) = resolve_downloads(
        settings.avg_downloads_override,
        measured_downloads,
        fallback_downloads,
    );
    let model = settings.pricing_model;

    let placements: Vec<PlacementEstimate> = Placement::ALL
        .into_iter()
        .map(|placement| {
            let rate = settings.rate_for(placement);
            let slots = sanitize_slots(rate.slots);
            let spot = if model.includes_spot() {
                spot_revenue(sanitize(rate.spot_cost), slots)
            } else {
                0.0
            };
            let cpm = if model.includes_cpm() {
                cpm_revenue(sanitize(rate.cpm), slots, downloads)
            } else {
                0.0
            };
            PlacementEstimate {
                placement,
                slots,
                spot_revenue: spot,
                cpm_revenue: cpm,
            }
        })
        .collect();

    let spot_total = finite_or_zero(placements.iter().map(|p| p.spot_revenue).sum());
    let cpm_total = finite_or_zero(placements.iter().map(|p| p.cpm_revenue).sum());

    RevenueEstimate {
        pricing_model: model,
        downloads,
        downloads_source,
        placements,
        spot_total,
        cpm_total,
        total: finite_or_zero(spot_total + cpm_total),
    }
}

/// Project an episode estimate across `episodes` episodes.
pub fn project(estimate: &RevenueEstimate, episodes: u32) -> f64 {
    if episodes == 0 {
        return 0.0;
    }
    finite_or_zero(sanitize(Some(estimate.total)) * episodes as f64)
}

/// Validate rates before they are stored. Estimation itself never fails.
pub fn validate_settings(settings: &RevenueSettings) -> Result<(), CoreError> {
    for placement in Placement::ALL {
        let rate = settings.rate_for(placement);
        let name = placement.as_str();
        for (field, value) in [("cpm", rate.cpm), ("spot_cost", rate.spot_cost)] {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=MAX_RATE).contains(&v) {
                    return Err(CoreError::Validation(format!(
                        "{name}.{field} must be between 0 and {MAX_RATE}, got {v}"
                    )));
                }
            }
        }
        if rate.slots.is_some_and(|s| s < 0) {
            return Err(CoreError::Validation(format!(
                "{name}.slots must not be negative"
            )));
        }
    }
    if let Some(v) = settings.avg_downloads_override {
        if !v.is_finite() || !(0.0..=MAX_AVG_DOWNLOADS).contains(&v) {
            return Err(CoreError::Validation(format!(
                "avg_downloads_override must be between 0 and {MAX_AVG_DOWNLOADS}, got {v}"
            )));
        }
    }
    Ok(())
}
