//! epicycles: hand-drawn closed curves → truncated Fourier series.
//!
//! Approximates an arbitrary closed 2D polyline by a truncated complex
//! Fourier series and exposes everything a renderer needs to draw the
//! progressive reconstruction: the approximated curve at a given order and
//! time, the epicycle circles, the segment decomposition, and an incremental
//! sample cache that keeps per-frame redrawing cheap.
//!
//! # Example
//!
//! ```
//! use epicycles::{ApproximationConfig, PathModel};
//! use kurbo::Point;
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//! ];
//! let drawing = PathModel::new(points)?;
//! let series = drawing.fourier_series(8, &ApproximationConfig::default())?;
//! // t = 0.25 is a quarter of the way around the closed square.
//! let pen = series.evaluate(8, 0.25)?;
//! assert!(pen.distance(Point::new(10.0, 0.0)) < 2.0);
//! # Ok::<(), epicycles::FourierError>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod path;
mod series;

pub mod error;
pub mod render;

// Re-export kurbo so downstream users get the same version
// used by the Point-based API.
pub use kurbo;

pub use config::ApproximationConfig;
pub use error::FourierError;
pub use path::PathModel;
pub use render::RenderOptions;
pub use series::{FourierCoefficient, FourierSeries};
