//! File export helpers.

/// CSV export of rate previews.
pub mod export;
