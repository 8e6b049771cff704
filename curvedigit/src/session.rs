// Digitization session
// Calibrate x, then y, then digitize any number of curves against the same image

use curvedigit_common::{Axis, PhysicalPoint};

use crate::calibration::{AxisScale, CalibrationRequest};
use crate::error::{DigitizeError, DigitizeResult};
use crate::transform::{transform_curve, Curve};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    AwaitingXCalibration,
    AwaitingYCalibration { x: AxisScale },
    /// Terminal; the scale pair is fixed for the rest of the session
    Ready { x: AxisScale, y: AxisScale },
}

impl SessionState {
    fn describe(&self) -> &'static str {
        match self {
            SessionState::AwaitingXCalibration => "awaiting x calibration",
            SessionState::AwaitingYCalibration { .. } => "awaiting y calibration",
            SessionState::Ready { .. } => "ready to digitize",
        }
    }
}

/// Owns the per-image calibration. One session per image.
#[derive(Debug, Clone)]
pub struct DigitizerSession {
    state: SessionState,
    curves_digitized: usize,
}

impl Default for DigitizerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitizerSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingXCalibration,
            curves_digitized: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready { .. })
    }

    /// The fixed `(x, y)` pair once both axes are calibrated
    pub fn scales(&self) -> Option<(AxisScale, AxisScale)> {
        match self.state {
            SessionState::Ready { x, y } => Some((x, y)),
            _ => None,
        }
    }

    pub fn curves_digitized(&self) -> usize {
        self.curves_digitized
    }

    /// Calibrate the x axis. Only legal as the first step.
    /// On error the state is unchanged so the caller can ask again.
    pub fn calibrate_x(&mut self, request: &CalibrationRequest) -> DigitizeResult<AxisScale> {
        if self.state != SessionState::AwaitingXCalibration {
            return Err(self.out_of_sequence("calibrate the x axis"));
        }
        expect_axis(request, Axis::X)?;

        let x = request.calibrate()?;
        self.state = SessionState::AwaitingYCalibration { x };
        tracing::debug!(factor = x.factor(), "x axis calibrated, awaiting y");
        Ok(x)
    }

    /// Calibrate the y axis after x. Moves the session to `Ready`.
    pub fn calibrate_y(&mut self, request: &CalibrationRequest) -> DigitizeResult<AxisScale> {
        let x = match self.state {
            SessionState::AwaitingYCalibration { x } => x,
            _ => return Err(self.out_of_sequence("calibrate the y axis")),
        };
        expect_axis(request, Axis::Y)?;

        let y = request.calibrate()?;
        self.state = SessionState::Ready { x, y };
        tracing::debug!(factor = y.factor(), "y axis calibrated, session ready");
        Ok(y)
    }

    /// Transform one curve with the session's scale pair
    pub fn digitize(&mut self, curve: &Curve) -> DigitizeResult<Vec<PhysicalPoint>> {
        let (x, y) = self
            .scales()
            .ok_or_else(|| self.out_of_sequence("digitize a curve"))?;

        let points = transform_curve(curve, x, y)?;
        self.curves_digitized += 1;
        tracing::debug!(
            curve = self.curves_digitized,
            points = points.len(),
            "curve digitized"
        );
        Ok(points)
    }

    fn out_of_sequence(&self, operation: &'static str) -> DigitizeError {
        DigitizeError::OutOfSequence {
            operation,
            state: self.state.describe(),
        }
    }
}

fn expect_axis(request: &CalibrationRequest, expected: Axis) -> DigitizeResult<()> {
    if request.axis != expected {
        return Err(DigitizeError::AxisMismatch {
            expected,
            got: request.axis,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvedigit_common::PixelPoint;

    fn x_request() -> CalibrationRequest {
        CalibrationRequest::new(
            PixelPoint::new(100.0, 50.0),
            PixelPoint::new(300.0, 50.0),
            Axis::X,
            10.0,
        )
    }

    fn y_request() -> CalibrationRequest {
        // 100 px downward is -2 units upward
        CalibrationRequest::new(
            PixelPoint::new(40.0, 50.0),
            PixelPoint::new(40.0, 150.0),
            Axis::Y,
            -2.0,
        )
    }

    fn ready_session() -> DigitizerSession {
        let mut session = DigitizerSession::new();
        session.calibrate_x(&x_request()).unwrap();
        session.calibrate_y(&y_request()).unwrap();
        session
    }

    #[test]
    fn test_states_advance_in_order() {
        let mut session = DigitizerSession::new();
        assert_eq!(session.state(), SessionState::AwaitingXCalibration);

        session.calibrate_x(&x_request()).unwrap();
        assert!(matches!(session.state(), SessionState::AwaitingYCalibration { .. }));
        assert!(session.scales().is_none());

        session.calibrate_y(&y_request()).unwrap();
        assert!(session.is_ready());
        let (x, y) = session.scales().unwrap();
        assert!((x.factor() - 0.05).abs() < 1e-12);
        assert!((y.factor() + 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_digitize_before_ready_is_rejected() {
        let mut session = DigitizerSession::new();
        let curve = Curve::from_points(vec![PixelPoint::new(1.0, 1.0)]);
        assert!(matches!(
            session.digitize(&curve),
            Err(DigitizeError::OutOfSequence { .. })
        ));

        session.calibrate_x(&x_request()).unwrap();
        assert!(matches!(
            session.digitize(&curve),
            Err(DigitizeError::OutOfSequence { .. })
        ));
        assert_eq!(session.curves_digitized(), 0);
    }

    #[test]
    fn test_y_before_x_is_rejected() {
        let mut session = DigitizerSession::new();
        let err = session.calibrate_y(&y_request()).unwrap_err();
        assert!(matches!(err, DigitizeError::OutOfSequence { .. }));
        assert_eq!(session.state(), SessionState::AwaitingXCalibration);
    }

    #[test]
    fn test_wrong_axis_request_is_rejected() {
        let mut session = DigitizerSession::new();
        assert!(matches!(
            session.calibrate_x(&y_request()),
            Err(DigitizeError::AxisMismatch { expected: Axis::X, got: Axis::Y })
        ));
        assert_eq!(session.state(), SessionState::AwaitingXCalibration);
    }

    #[test]
    fn test_no_recalibration_once_ready() {
        let mut session = ready_session();
        let before = session.state();
        assert!(session.calibrate_x(&x_request()).is_err());
        assert!(session.calibrate_y(&y_request()).is_err());
        assert_eq!(session.state(), before);
    }

    #[test]
    fn test_failed_calibration_allows_retry() {
        let mut session = DigitizerSession::new();
        let mut bad = x_request();
        bad.ref_b = bad.ref_a;
        assert!(matches!(
            session.calibrate_x(&bad),
            Err(DigitizeError::DegenerateCalibration { .. })
        ));
        assert_eq!(session.state(), SessionState::AwaitingXCalibration);

        let mut nan_length = x_request();
        nan_length.reference_length = f64::NAN;
        assert!(session.calibrate_x(&nan_length).is_err());

        session.calibrate_x(&x_request()).unwrap();
        assert!(matches!(session.state(), SessionState::AwaitingYCalibration { .. }));
    }

    #[test]
    fn test_many_curves_share_scales() {
        let mut session = ready_session();
        let first = Curve::from_points(vec![
            PixelPoint::new(100.0, 50.0),
            PixelPoint::new(200.0, 50.0),
            PixelPoint::new(300.0, 150.0),
        ]);
        let second = Curve::from_points(vec![PixelPoint::new(0.0, 0.0), PixelPoint::new(20.0, 10.0)]);

        let a = session.digitize(&first).unwrap();
        let b = session.digitize(&second).unwrap();
        assert!((a[2].x - 10.0).abs() < 1e-12);
        assert!((a[2].y + 2.0).abs() < 1e-12);
        assert!((b[1].x - 1.0).abs() < 1e-12);
        assert!((b[1].y + 0.2).abs() < 1e-12);
        assert_eq!(session.curves_digitized(), 2);
    }

    #[test]
    fn test_empty_curve_does_not_count() {
        let mut session = ready_session();
        assert!(matches!(
            session.digitize(&Curve::new()),
            Err(DigitizeError::EmptyCurve)
        ));
        assert_eq!(session.curves_digitized(), 0);
        assert!(session.is_ready());
    }
}
