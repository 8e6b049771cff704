// Curve transformation module
// Maps a digitized pixel curve into physical units, anchored at its first point

use curvedigit_common::{Axis, PhysicalPoint, PixelPoint};
use serde::{Deserialize, Serialize};

use crate::calibration::AxisScale;
use crate::error::{DigitizeError, DigitizeResult};

/// Digitized curve in click order. Index 0 is the origin anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    points: Vec<PixelPoint>,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: PixelPoint) {
        self.points.push(point);
    }

    /// Drop the most recent click, if any
    pub fn pop(&mut self) -> Option<PixelPoint> {
        self.points.pop()
    }

    pub fn points(&self) -> &[PixelPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn origin(&self) -> Option<PixelPoint> {
        self.points.first().copied()
    }
}

impl From<Vec<PixelPoint>> for Curve {
    fn from(points: Vec<PixelPoint>) -> Self {
        Self::from_points(points)
    }
}

/// Convert pixel points to physical coordinates.
///
/// `result[i] = (p[i] - p[0]) * scale` per axis, so `result[0]` is always
/// `(0, 0)`. Each output depends only on its own input and the anchor; order
/// and duplicates are kept. Non-finite coordinates pass through as-is.
pub fn transform(
    points: &[PixelPoint],
    x_scale: AxisScale,
    y_scale: AxisScale,
) -> DigitizeResult<Vec<PhysicalPoint>> {
    let x_scale = x_scale.validated_for(Axis::X)?;
    let y_scale = y_scale.validated_for(Axis::Y)?;
    let origin = *points.first().ok_or(DigitizeError::EmptyCurve)?;

    let (kx, ky) = (x_scale.factor(), y_scale.factor());
    let result: Vec<PhysicalPoint> = points
        .iter()
        // `+ 0.0` folds -0.0 (zero offset times a negative factor) into 0.0
        .map(|p| PhysicalPoint::new((p.x - origin.x) * kx + 0.0, (p.y - origin.y) * ky + 0.0))
        .collect();

    tracing::debug!(
        points = result.len(),
        origin = %origin,
        x_factor = kx,
        y_factor = ky,
        "curve transformed"
    );
    Ok(result)
}

pub fn transform_curve(
    curve: &Curve,
    x_scale: AxisScale,
    y_scale: AxisScale,
) -> DigitizeResult<Vec<PhysicalPoint>> {
    transform(curve.points(), x_scale, y_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scales(kx: f64, ky: f64) -> (AxisScale, AxisScale) {
        (
            AxisScale::new(Axis::X, kx).unwrap(),
            AxisScale::new(Axis::Y, ky).unwrap(),
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
    }

    fn sample_curve() -> Vec<PixelPoint> {
        vec![
            PixelPoint::new(100.0, 50.0),
            PixelPoint::new(200.0, 50.0),
            PixelPoint::new(300.0, 150.0),
        ]
    }

    #[test]
    fn test_reference_curve() {
        let (x, y) = scales(0.05, -0.02);
        let out = transform(&sample_curve(), x, y).unwrap();

        let expected = [(0.0, 0.0), (5.0, 0.0), (10.0, -2.0)];
        assert_eq!(out.len(), expected.len());
        for (p, (ex, ey)) in out.iter().zip(expected) {
            assert!(close(p.x, ex), "x {} != {}", p.x, ex);
            assert!(close(p.y, ey), "y {} != {}", p.y, ey);
        }
    }

    #[test]
    fn test_first_point_is_exact_origin() {
        let (x, y) = scales(3.3, 0.7);
        let points = vec![PixelPoint::new(123.456, 789.012), PixelPoint::new(1.0, 2.0)];
        let out = transform(&points, x, y).unwrap();
        assert_eq!(out[0], PhysicalPoint::origin());
    }

    #[test]
    fn test_origin_has_no_negative_zero() {
        let (x, y) = scales(-0.05, -0.02);
        let out = transform(&sample_curve(), x, y).unwrap();
        assert!(out[0].x.is_sign_positive());
        assert!(out[0].y.is_sign_positive());
        assert!(out[1].y.is_sign_positive());
    }

    #[test]
    fn test_swapped_scales_rejected() {
        let (x, y) = scales(0.05, -0.02);
        let err = transform(&sample_curve(), y, x).unwrap_err();
        assert!(matches!(
            err,
            DigitizeError::AxisMismatch { expected: Axis::X, got: Axis::Y }
        ));

        let err = transform(&sample_curve(), x, x).unwrap_err();
        assert!(matches!(
            err,
            DigitizeError::AxisMismatch { expected: Axis::Y, got: Axis::X }
        ));
    }

    #[test]
    fn test_single_point_curve() {
        let (x, y) = scales(1.0, 1.0);
        let out = transform(&[PixelPoint::new(9.0, 9.0)], x, y).unwrap();
        assert_eq!(out, vec![PhysicalPoint::origin()]);
    }

    #[test]
    fn test_empty_curve_rejected() {
        let (x, y) = scales(0.05, 0.05);
        let err = transform(&[], x, y).unwrap_err();
        assert!(matches!(err, DigitizeError::EmptyCurve));
    }

    #[test]
    fn test_elementwise_independence() {
        let (x, y) = scales(0.5, -2.0);
        let full = transform(&sample_curve(), x, y).unwrap();

        // dropping the middle point leaves the others untouched
        let mut partial_input = sample_curve();
        partial_input.remove(1);
        let partial = transform(&partial_input, x, y).unwrap();
        assert_eq!(partial[0], full[0]);
        assert_eq!(partial[1], full[2]);
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let (x, y) = scales(2.0, 2.0);
        let points = vec![
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(5.0, 5.0),
            PixelPoint::new(1.0, 1.0),
            PixelPoint::new(5.0, 5.0),
        ];
        let out = transform(&points, x, y).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[1], out[3]);
        assert_eq!(out[2], PhysicalPoint::new(2.0, 2.0));
    }

    #[test]
    fn test_deterministic_output() {
        let (x, y) = scales(0.013, 0.027);
        let a = transform(&sample_curve(), x, y).unwrap();
        let b = transform(&sample_curve(), x, y).unwrap();
        for (p, q) in a.iter().zip(&b) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
    }

    #[test]
    fn test_x_scale_linearity() {
        let (x, y) = scales(0.05, -0.02);
        let base = transform(&sample_curve(), x, y).unwrap();
        for k in [3.0, -0.5, 1e-3] {
            let scaled = transform(&sample_curve(), x.scaled_by(k).unwrap(), y).unwrap();
            for (b, s) in base.iter().zip(&scaled) {
                assert!(close(s.x, b.x * k));
                assert_eq!(s.y, b.y);
            }
        }
    }

    #[test]
    fn test_non_finite_points_propagate() {
        let (x, y) = scales(1.0, 1.0);
        let points = vec![
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(f64::NAN, 1.0),
            PixelPoint::new(2.0, f64::INFINITY),
        ];
        let out = transform(&points, x, y).unwrap();
        assert!(out[1].x.is_nan());
        assert_eq!(out[1].y, 1.0);
        assert_eq!(out[2].y, f64::INFINITY);
    }

    #[test]
    fn test_curve_wrapper() {
        let mut curve = Curve::new();
        curve.push(PixelPoint::new(10.0, 10.0));
        curve.push(PixelPoint::new(20.0, 30.0));
        assert_eq!(curve.origin(), Some(PixelPoint::new(10.0, 10.0)));

        let (x, y) = scales(0.1, 0.1);
        let out = transform_curve(&curve, x, y).unwrap();
        assert!(close(out[1].x, 1.0));
        assert!(close(out[1].y, 2.0));
    }
}
