//! Error types shared across the Camber crates.

use thiserror::Error;

/// Convenience result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by IR construction and toolpath synthesis.
///
/// All of these indicate a bug in the calling code or a malformed
/// geometric input, not a recoverable machine condition. Recoverable
/// conditions (bounds violations, forbidden tools, adjacency drift)
/// are reported as warning counts instead, never as `Err`.
#[derive(Debug, Error)]
pub enum Error {
    /// An arc was constructed whose endpoints are not equidistant from
    /// its center.
    #[error(
        "arc radius mismatch: |center-start| = {start_radius:.6}, \
         |center-end| = {end_radius:.6} (tolerance {tolerance})"
    )]
    ArcRadiusMismatch {
        start_radius: f64,
        end_radius: f64,
        tolerance: f64,
    },

    /// Blade realignment produced an arc whose radius drifted from the
    /// configured blade radius. Unreachable for finite, non-zero
    /// orientation vectors.
    #[error("blade realignment radius {actual:.6} differs from blade radius {expected:.6}")]
    BladeGeometry { expected: f64, actual: f64 },

    /// A cut or transition required a direction but the curve has none
    /// (zero-length segment).
    #[error("degenerate curve: {context}")]
    DegenerateCurve { context: String },
}
