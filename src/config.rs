use crate::error::FourierError;

/// All approximation parameters in one struct.
/// Passed explicitly into [`PathModel`](crate::PathModel) /
/// [`FourierSeries`](crate::FourierSeries) construction so there is no
/// ambient tuning state; adjustable at runtime (for editor sliders).
#[derive(Debug, Clone)]
pub struct ApproximationConfig {
    /// Integration samples per unit of path length.
    ///
    /// The coefficient integral is evaluated with a midpoint rule over
    /// `ceil(integration_precision * path_length)` equal-length steps.
    /// Below 1.0 the reconstruction visibly degrades at high orders;
    /// raising it improves coefficient accuracy at linear cost.
    pub integration_precision: f64,

    /// Cached curve samples per unit of path length.
    ///
    /// Controls the time resolution of the partial-curve cache: the period
    /// is split into `ceil(curve_precision * path_length)` sample steps.
    /// Higher values give a smoother rendered curve and a larger cache.
    pub curve_precision: f64,
}

impl Default for ApproximationConfig {
    fn default() -> Self {
        Self {
            integration_precision: 2.0,
            curve_precision: 1.0,
        }
    }
}

impl ApproximationConfig {
    /// Both precisions must be positive and finite.
    pub fn validate(&self) -> Result<(), FourierError> {
        for (name, value) in [
            ("integration_precision", self.integration_precision),
            ("curve_precision", self.curve_precision),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FourierError::InvalidArgument(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
