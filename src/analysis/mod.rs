/// Risk analysis: the 30-day heavy-rain estimator.
///
/// `heavy_rain` holds the whole model: per-day climatological
/// probabilities, heavy-day counting, and the forecast/climatology
/// combination. The module is pure except for the two `estimate_risk`
/// entry points, which pull their inputs through the `acquire` traits.

pub mod heavy_rain;

pub use heavy_rain::{estimate_risk, estimate_risk_concurrent};
