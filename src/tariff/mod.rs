//! Time-of-use tariff model: categories, rate bands, noise and the pricing pipeline.

/// Rate bands and per-category rate tables.
pub mod band;
pub mod category;
/// Uniform random sources and normal draws.
pub mod noise;
/// Ordered modifier pipeline.
pub mod pipeline;

pub use band::{RateBand, RateTable, Resolved};
pub use category::{ConsumerCategory, Season};
pub use noise::{FixedDraws, RandomSource};
pub use pipeline::{PricingModel, RateBreakdown, RateContext, round_to_cents};
