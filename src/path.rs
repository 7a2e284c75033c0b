//! Arc-length parametrized path model for a hand-drawn polyline.
//!
//! Wraps the finalized input points, makes the path 1-periodic by adding an
//! implicit closing segment, and performs the numerical integration that
//! yields the Fourier coefficients of `f(t) = x(t) + i*y(t)`.

use std::f64::consts::TAU;
use std::time::Instant;

use kurbo::{Point, Rect};
use rayon::prelude::*;

use crate::config::ApproximationConfig;
use crate::error::FourierError;
use crate::series::{FourierCoefficient, FourierSeries};

/// A 2D polyline parametrized by arc length.
///
/// The parameter `t` in `[0, 1]` maps to the position a pen reaches after
/// traveling `t * path_length` along the path. Construction appends a copy
/// of the first point when the input is not already closed, so the path is
/// periodic and suitable for Fourier analysis. Immutable after construction;
/// a new drawing requires a new `PathModel`.
#[derive(Debug, Clone)]
pub struct PathModel {
    points: Vec<Point>,
    path_length: f64,
    original_path_duration: f64,
}

impl PathModel {
    /// Build a path model from a finalized point list.
    ///
    /// Fails with [`FourierError::InvalidPath`] for fewer than 2 points or
    /// non-finite coordinates, and [`FourierError::DegeneratePath`] when all
    /// points coincide (zero total length).
    pub fn new(points: Vec<Point>) -> Result<Self, FourierError> {
        if points.len() < 2 {
            return Err(FourierError::InvalidPath(format!(
                "a path needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(FourierError::InvalidPath(format!(
                "non-finite coordinate ({}, {})",
                p.x, p.y
            )));
        }

        let mut points = points;
        let original_length: f64 = points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum();

        // Artificially close the path so it is periodic.
        let first = points[0];
        let last = points[points.len() - 1];
        let mut path_length = original_length;
        if first != last {
            path_length += last.distance(first);
            points.push(first);
        }

        if path_length == 0.0 {
            return Err(FourierError::DegeneratePath);
        }

        Ok(Self {
            points,
            path_length,
            original_path_duration: original_length / path_length,
        })
    }

    /// Total periodic path length, closing segment included.
    pub fn path_length(&self) -> f64 {
        self.path_length
    }

    /// Fraction of the periodic length occupied by the drawn (non-closing)
    /// portion. Renderers that must stop before the synthetic closing
    /// segment clamp their time parameter to this value.
    pub fn original_path_duration(&self) -> f64 {
        self.original_path_duration
    }

    /// Axis-aligned bounding box of the input points.
    pub fn bounding_box(&self) -> Rect {
        let first = self.points[0];
        let mut bounds = Rect::new(first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            bounds = bounds.union_pt(*p);
        }
        bounds
    }

    /// Position after traveling `t * path_length` along the path.
    ///
    /// `t` is clamped to `[0, 1]`; at `t = 1` the pen is back at the start.
    /// Linear scan over the segments, so O(points) per call; callers only
    /// use this when redrawing the original curve, not per coefficient.
    pub fn point_at_fraction(&self, t: f64) -> Result<Point, FourierError> {
        let t = validate_time(t)?;
        let desired_length = t * self.path_length;

        let mut walked = 0.0;
        for pair in self.points.windows(2) {
            let segment_length = pair[0].distance(pair[1]);
            if walked + segment_length < desired_length {
                walked += segment_length;
            } else if segment_length > 0.0 {
                let f = (desired_length - walked) / segment_length;
                return Ok(pair[0].lerp(pair[1], f));
            } else {
                return Ok(pair[0]);
            }
        }
        // Rounding pushed desired_length past the last segment.
        Ok(self.points[self.points.len() - 1])
    }

    /// Visit the vertices of the polyline from its start up to
    /// length-fraction `t`: every fully covered vertex, then one
    /// interpolated tip inside the segment containing `t * path_length`.
    pub fn polyline_to(
        &self,
        t: f64,
        mut visit: impl FnMut(Point),
    ) -> Result<(), FourierError> {
        let t = validate_time(t)?;
        let desired_length = t * self.path_length;

        visit(self.points[0]);
        let mut walked = 0.0;
        for pair in self.points.windows(2) {
            let segment_length = pair[0].distance(pair[1]);
            if walked + segment_length < desired_length {
                walked += segment_length;
                visit(pair[1]);
            } else {
                if segment_length > 0.0 {
                    let f = (desired_length - walked) / segment_length;
                    visit(pair[0].lerp(pair[1], f));
                }
                break;
            }
        }
        Ok(())
    }

    /// Compute the truncated Fourier series of the path.
    ///
    /// Integrates `c_n = integral of f(t) * e^{-2*pi*i*n*t} dt` for
    /// `n = 0, 1, -1, ..., +order, -order` with a midpoint rule over
    /// equal-length steps of the path. The geometry samples are precomputed
    /// once and shared across all coefficients, so the cost is O(steps) for
    /// sampling plus O(order * steps) for the trigonometric accumulation.
    ///
    /// This is the one potentially slow call (runs once per loaded drawing,
    /// not per frame); keep it off the render path.
    pub fn fourier_series(
        &self,
        order: usize,
        config: &ApproximationConfig,
    ) -> Result<FourierSeries, FourierError> {
        config.validate()?;
        let t_start = Instant::now();

        let nb_steps = (config.integration_precision * self.path_length).ceil() as usize;
        let samples = self.integration_samples(nb_steps);
        let dt = 1.0 / nb_steps as f64;

        let coefficients: Vec<FourierCoefficient> = (0..2 * order + 1)
            .into_par_iter()
            .map(|i| {
                let mut n = ((i + 1) / 2) as i32;
                if i > 0 && i % 2 == 0 {
                    n = -n;
                }

                let mut re = 0.0;
                let mut im = 0.0;
                for sample in &samples {
                    let (sin, cos) = (n as f64 * sample.two_pi_t).sin_cos();
                    re += dt * (sample.x * cos + sample.y * sin);
                    im += dt * (sample.y * cos - sample.x * sin);
                }

                FourierCoefficient {
                    n,
                    magnitude: re.hypot(im),
                    phase: im.atan2(re),
                }
            })
            .collect();

        eprintln!(
            "  Fourier     order {} \u{2192} {} coefficients, {} integration steps  ({}ms)",
            order,
            coefficients.len(),
            nb_steps,
            t_start.elapsed().as_millis(),
        );

        FourierSeries::new(coefficients, self.path_length, config)
    }

    /// Midpoint samples of the path at `nb_steps` equal-length steps.
    ///
    /// A marching segment pointer keeps the whole pass O(steps + points):
    /// both the step midpoints and the polyline are walked in increasing
    /// arc-length order.
    fn integration_samples(&self, nb_steps: usize) -> Vec<IntegrationSample> {
        let step_size = self.path_length / nb_steps as f64;
        let dt = 1.0 / nb_steps as f64;

        let mut samples = Vec::with_capacity(nb_steps);
        let mut walked = 0.0;
        let mut segment = 0;
        for i_step in 0..nb_steps {
            let desired_t = (i_step as f64 + 0.5) * dt;
            let desired_length = (i_step as f64 + 0.5) * step_size;

            let point = loop {
                if segment + 1 >= self.points.len() {
                    // Rounding pushed the midpoint past the last segment.
                    break self.points[self.points.len() - 1];
                }
                let a = self.points[segment];
                let b = self.points[segment + 1];
                let segment_length = a.distance(b);
                if walked + segment_length < desired_length {
                    walked += segment_length;
                    segment += 1;
                } else if segment_length > 0.0 {
                    break a.lerp(b, (desired_length - walked) / segment_length);
                } else {
                    break a;
                }
            };

            samples.push(IntegrationSample {
                x: point.x,
                y: point.y,
                two_pi_t: TAU * desired_t,
            });
        }
        samples
    }
}

/// One precomputed geometry sample, shared across all coefficients.
struct IntegrationSample {
    x: f64,
    y: f64,
    /// `2*pi*t` at the arc length where the path was evaluated.
    two_pi_t: f64,
}

pub(crate) fn validate_time(t: f64) -> Result<f64, FourierError> {
    if !t.is_finite() {
        return Err(FourierError::InvalidArgument(format!(
            "time must be finite, got {}",
            t
        )));
    }
    Ok(t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn path_length_includes_closing_segment() {
        let path = PathModel::new(open_square()).unwrap();
        assert!((path.path_length() - 40.0).abs() < 1e-12);
        // Drawn portion is 3 of the 4 edges.
        assert!((path.original_path_duration() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn closed_input_is_not_extended() {
        let mut points = open_square();
        points.push(Point::new(0.0, 0.0));
        let path = PathModel::new(points).unwrap();
        assert!((path.path_length() - 40.0).abs() < 1e-12);
        assert!((path.original_path_duration() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_points_rejected() {
        let err = PathModel::new(vec![Point::new(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, FourierError::InvalidPath(_)));
    }

    #[test]
    fn coincident_point_pair_is_degenerate() {
        let points = vec![Point::new(5.0, 5.0), Point::new(5.0, 5.0)];
        let err = PathModel::new(points).unwrap_err();
        assert!(matches!(err, FourierError::DegeneratePath));
    }

    #[test]
    fn non_finite_coordinate_rejected() {
        let points = vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)];
        let err = PathModel::new(points).unwrap_err();
        assert!(matches!(err, FourierError::InvalidPath(_)));
    }

    #[test]
    fn point_at_fraction_hits_edge_midpoint() {
        let path = PathModel::new(open_square()).unwrap();
        // 0.125 * 40 = 5 units along the first edge.
        let p = path.point_at_fraction(0.125).unwrap();
        assert!(p.distance(Point::new(5.0, 0.0)) < 1e-12);
    }

    #[test]
    fn point_at_fraction_clamps_and_wraps() {
        let path = PathModel::new(open_square()).unwrap();
        let start = path.point_at_fraction(-3.0).unwrap();
        assert!(start.distance(Point::new(0.0, 0.0)) < 1e-12);
        // t = 1 is the end of the closing segment, back at the start.
        let end = path.point_at_fraction(7.0).unwrap();
        assert!(end.distance(Point::new(0.0, 0.0)) < 1e-12);
    }

    #[test]
    fn point_at_fraction_rejects_non_finite_time() {
        let path = PathModel::new(open_square()).unwrap();
        let err = path.point_at_fraction(f64::NAN).unwrap_err();
        assert!(matches!(err, FourierError::InvalidArgument(_)));
    }

    #[test]
    fn polyline_to_stops_inside_a_segment() {
        let path = PathModel::new(open_square()).unwrap();
        let mut visited = Vec::new();
        // 0.375 * 40 = 15 units: first edge plus half of the second.
        path.polyline_to(0.375, |p| visited.push(p)).unwrap();
        assert_eq!(visited.len(), 3);
        assert!(visited[0].distance(Point::new(0.0, 0.0)) < 1e-12);
        assert!(visited[1].distance(Point::new(10.0, 0.0)) < 1e-12);
        assert!(visited[2].distance(Point::new(10.0, 5.0)) < 1e-12);
    }

    #[test]
    fn coefficients_follow_canonical_ordering() {
        let path = PathModel::new(open_square()).unwrap();
        let series = path
            .fourier_series(3, &ApproximationConfig::default())
            .unwrap();
        let ns: Vec<i32> = series.coefficients().iter().map(|c| c.n).collect();
        assert_eq!(ns, vec![0, 1, -1, 2, -2, 3, -3]);
    }

    #[test]
    fn constant_coefficient_is_the_centroid() {
        let path = PathModel::new(open_square()).unwrap();
        let series = path
            .fourier_series(0, &ApproximationConfig {
                integration_precision: 20.0,
                ..Default::default()
            })
            .unwrap();
        let c0 = series.coefficients()[0];
        let centroid = Point::new(c0.magnitude * c0.phase.cos(), c0.magnitude * c0.phase.sin());
        assert!(centroid.distance(Point::new(5.0, 5.0)) < 0.05);
    }

    #[test]
    fn invalid_config_rejected() {
        let path = PathModel::new(open_square()).unwrap();
        let config = ApproximationConfig {
            integration_precision: -1.0,
            ..Default::default()
        };
        let err = path.fourier_series(2, &config).unwrap_err();
        assert!(matches!(err, FourierError::InvalidArgument(_)));
    }

    #[test]
    fn bounding_box_covers_all_points() {
        let path = PathModel::new(open_square()).unwrap();
        let bounds = path.bounding_box();
        assert_eq!((bounds.x0, bounds.y0, bounds.x1, bounds.y1), (0.0, 0.0, 10.0, 10.0));
    }
}
