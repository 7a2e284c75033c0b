//! Truncated complex Fourier series of a closed curve.
//!
//! Owns the canonicalized coefficient list and the incremental partial-curve
//! cache. All geometry leaves through visitor callbacks; the series never
//! touches a drawing API.

use std::f64::consts::TAU;

use kurbo::{Point, Vec2};

use crate::config::ApproximationConfig;
use crate::error::FourierError;
use crate::path::validate_time;

/// One complex coefficient `c_n = magnitude * e^{i*phase}` of the 1-periodic
/// signal `f(t) = x(t) + i*y(t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierCoefficient {
    pub n: i32,
    /// Non-negative; the radius of this term's epicycle.
    pub magnitude: f64,
    /// Radians, any range.
    pub phase: f64,
}

impl FourierCoefficient {
    /// This term's contribution to the pen position at time `t`.
    fn term(&self, t: f64) -> Vec2 {
        let (sin, cos) = (TAU * self.n as f64 * t + self.phase).sin_cos();
        Vec2::new(self.magnitude * cos, self.magnitude * sin)
    }
}

/// A truncated Fourier series with an order/time-indexed curve cache.
///
/// Coefficients are stored in the canonical order
/// `n = 0, 1, -1, 2, -2, 3, -3, ...`; an approximation of order `k` sums the
/// first `2k + 1` of them. Orders beyond the precomputed maximum clamp
/// silently (a UI order slider routinely overshoots).
///
/// The cache (`partial_curve`) memoizes curve samples at times
/// `0, curve_step, 2*curve_step, ...` so a frame loop can redraw the
/// reconstruction without re-evaluating the whole prefix sum per sample.
#[derive(Debug, Clone)]
pub struct FourierSeries {
    coefficients: Vec<FourierCoefficient>,
    curve_step: f64,
    partial_curve: Vec<Point>,
    partial_curve_order: usize,
}

impl FourierSeries {
    /// Build a series from a canonical coefficient list.
    ///
    /// The list must hold the constant term plus symmetric `+n`/`-n` pairs;
    /// a trailing unpaired element (even count) is dropped to restore that
    /// invariant. Fails when no coefficient is left or `path_length` is not
    /// a positive finite number.
    pub fn new(
        coefficients: Vec<FourierCoefficient>,
        path_length: f64,
        config: &ApproximationConfig,
    ) -> Result<Self, FourierError> {
        config.validate()?;
        if !path_length.is_finite() || path_length <= 0.0 {
            return Err(FourierError::InvalidArgument(format!(
                "path length must be positive and finite, got {}",
                path_length
            )));
        }

        let mut coefficients = coefficients;
        if coefficients.len() % 2 == 0 {
            coefficients.pop();
        }
        if coefficients.is_empty() {
            return Err(FourierError::InvalidArgument(
                "a series needs at least the n = 0 coefficient".into(),
            ));
        }

        let nb_curve_steps = (config.curve_precision * path_length).ceil().max(1.0);
        Ok(Self {
            coefficients,
            curve_step: 1.0 / nb_curve_steps,
            partial_curve: Vec::new(),
            partial_curve_order: 0,
        })
    }

    /// Canonically ordered coefficients.
    pub fn coefficients(&self) -> &[FourierCoefficient] {
        &self.coefficients
    }

    /// Time resolution of the cached curve samples.
    pub fn curve_step(&self) -> f64 {
        self.curve_step
    }

    /// Highest truncation order the coefficient list can serve.
    pub fn max_order(&self) -> usize {
        (self.coefficients.len() - 1) / 2
    }

    /// Approximated curve position at time `t`, truncated at `order`.
    ///
    /// Pure prefix sum, no cache side effects, O(order).
    pub fn evaluate(&self, order: usize, t: f64) -> Result<Point, FourierError> {
        let t = validate_time(t)?;
        Ok(eval_terms(&self.coefficients[..self.term_count(order)], t))
    }

    /// Walk the truncated prefix, visiting `(center, radius)` for every
    /// epicycle circle before its term is folded into the running pen
    /// position. Returns the final pen position, equal to
    /// [`evaluate`](Self::evaluate).
    ///
    /// The `n = 0` and `n = 1` circles are skipped: at the viewport scales
    /// this feeds, the constant offset and the fundamental only translate
    /// the center. Callers wanting every circle can fold those two terms
    /// themselves from [`coefficients`](Self::coefficients).
    pub fn circles_to_point(
        &self,
        order: usize,
        t: f64,
        mut visit: impl FnMut(Point, f64),
    ) -> Result<Point, FourierError> {
        let t = validate_time(t)?;
        let mut pen = Point::ZERO;
        for c in &self.coefficients[..self.term_count(order)] {
            if c.n != 0 && c.n != 1 {
                visit(pen, c.magnitude);
            }
            pen += c.term(t);
        }
        Ok(pen)
    }

    /// Walk the truncated prefix, visiting the origin and then every running
    /// partial sum: the polyline of the vector decomposition. Returns the
    /// final pen position, equal to [`evaluate`](Self::evaluate).
    pub fn segments_to_point(
        &self,
        order: usize,
        t: f64,
        mut visit: impl FnMut(Point),
    ) -> Result<Point, FourierError> {
        let t = validate_time(t)?;
        let mut pen = Point::ZERO;
        visit(pen);
        for c in &self.coefficients[..self.term_count(order)] {
            pen += c.term(t);
            visit(pen);
        }
        Ok(pen)
    }

    /// Visit the reconstructed curve from time 0 up to `t` at the given
    /// (floored) order, reusing and extending the sample cache.
    ///
    /// Visits every cached sample up to `floor(t / curve_step)`, then one
    /// interpolated point inside the final fractional step. Returns the
    /// exact fractional sample index `t / curve_step`.
    ///
    /// Cache policy: an order decrease invalidates the cache automatically
    /// (stale higher-frequency contributions cannot be subtracted safely);
    /// an order increase folds the missing coefficient band into the cached
    /// samples in place. Afterwards `partial_curve[i]` equals
    /// `evaluate(effective_order, i * curve_step)` for every cached `i`,
    /// regardless of the sequence of past order/time requests.
    pub fn render_curve(
        &mut self,
        order: f64,
        t: f64,
        mut visit: impl FnMut(Point),
    ) -> Result<f64, FourierError> {
        let order = validate_order(order)?;
        let t = validate_time(t)?;
        let index = self.ensure_cache(order as usize, t);

        let full = index.floor() as usize;
        for point in &self.partial_curve[..=full] {
            visit(*point);
        }
        let fraction = index.fract();
        if fraction > 0.0 {
            visit(self.partial_curve[full].lerp(self.partial_curve[full + 1], fraction));
        }
        Ok(index)
    }

    /// Like [`render_curve`](Self::render_curve), but for a continuously
    /// animated order: the `|n| = floor(order) + 1` coefficient pair is
    /// blended into every visited sample, scaled by the fractional part of
    /// `order`, so one more frequency fades in smoothly.
    ///
    /// The blend linearly interpolates a nonlinear trigonometric
    /// contribution: good enough for animation, not for numerical fidelity.
    /// At integral orders it matches `render_curve` exactly.
    pub fn render_curve_at_fractional_order(
        &mut self,
        order: f64,
        t: f64,
        mut visit: impl FnMut(Point),
    ) -> Result<f64, FourierError> {
        // Clamp before any index arithmetic; at or past the maximum order
        // the fading-in band is empty and this matches `render_curve`.
        let floored = (validate_order(order)? as usize).min(self.max_order());
        let fraction_of_order = order.fract();
        let t = validate_time(t)?;
        let index = self.ensure_cache(floored, t);

        // Coefficient indices of the fading-in band.
        let lo = (2 * floored + 1).min(self.coefficients.len());
        let hi = (2 * floored + 3).min(self.coefficients.len());

        let blended = |series: &Self, i: usize| -> Point {
            let mut point = series.partial_curve[i];
            if fraction_of_order > 0.0 {
                let time = i as f64 * series.curve_step;
                for c in &series.coefficients[lo..hi] {
                    point += c.term(time) * fraction_of_order;
                }
            }
            point
        };

        let full = index.floor() as usize;
        for i in 0..=full {
            visit(blended(self, i));
        }
        let fraction = index.fract();
        if fraction > 0.0 {
            visit(blended(self, full).lerp(blended(self, full + 1), fraction));
        }
        Ok(index)
    }

    /// Clear the sample cache. Call when restarting an animation loop
    /// (time rewinds to 0) or whenever a rebuild from scratch must be
    /// guaranteed; order decreases are already handled automatically.
    pub fn reset_curve(&mut self) {
        self.partial_curve.clear();
        self.partial_curve_order = 0;
    }

    // ── Cache maintenance ─────────────────────────────────

    /// Bring the cache to `effective order = min(order, max_order)` and make
    /// sure it reaches one sample past `t`. Returns `t / curve_step`.
    fn ensure_cache(&mut self, order: usize, t: f64) -> f64 {
        let order = order.min(self.max_order());

        if order < self.partial_curve_order {
            // The cache can only be extended with additional frequency
            // content, never reduced without keeping stale terms.
            self.partial_curve.clear();
        } else if order > self.partial_curve_order {
            // Fold the missing band into every cached sample, each at its
            // own sample time.
            let lo = (2 * self.partial_curve_order + 1).min(self.coefficients.len());
            let hi = (2 * order + 1).min(self.coefficients.len());
            let band = &self.coefficients[lo..hi];
            let step = self.curve_step;
            for (i, point) in self.partial_curve.iter_mut().enumerate() {
                let time = i as f64 * step;
                for c in band {
                    *point += c.term(time);
                }
            }
        }

        let index = t / self.curve_step;
        // One sample beyond the requested time, to support interpolation.
        let target_len = index.ceil() as usize + 1;
        for i in self.partial_curve.len()..target_len {
            let time = i as f64 * self.curve_step;
            let sample = eval_terms(&self.coefficients[..2 * order + 1], time);
            self.partial_curve.push(sample);
        }

        self.partial_curve_order = order;
        index
    }

    fn term_count(&self, order: usize) -> usize {
        self.coefficients
            .len()
            .min(order.saturating_mul(2).saturating_add(1))
    }
}

fn eval_terms(coefficients: &[FourierCoefficient], t: f64) -> Point {
    let mut pen = Point::ZERO;
    for c in coefficients {
        pen += c.term(t);
    }
    pen
}

fn validate_order(order: f64) -> Result<f64, FourierError> {
    if !order.is_finite() || order < 0.0 {
        return Err(FourierError::InvalidArgument(format!(
            "order must be non-negative and finite, got {}",
            order
        )));
    }
    Ok(order.floor())
}
