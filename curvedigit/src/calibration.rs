// Axis calibration module
// Derives a units-per-pixel factor from two reference clicks and a known length

use std::fmt;

use curvedigit_common::{Axis, PixelPoint};
use serde::{Deserialize, Serialize};

use crate::error::{DigitizeError, DigitizeResult};

/// Scale factor for one axis, in physical units per pixel.
/// Always finite and non-zero; the sign follows the click order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisScale {
    axis: Axis,
    factor: f64,
}

impl AxisScale {
    pub fn new(axis: Axis, factor: f64) -> DigitizeResult<Self> {
        if !factor.is_finite() || factor == 0.0 {
            return Err(DigitizeError::InvalidScale { axis, value: factor });
        }
        Ok(Self { axis, factor })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Same axis, factor multiplied by `k`
    pub fn scaled_by(&self, k: f64) -> DigitizeResult<Self> {
        Self::new(self.axis, self.factor * k)
    }

    /// Re-check the invariant and the axis before the scale touches a curve
    pub(crate) fn validated_for(self, expected: Axis) -> DigitizeResult<Self> {
        if self.axis != expected {
            return Err(DigitizeError::AxisMismatch {
                expected,
                got: self.axis,
            });
        }
        Self::new(self.axis, self.factor)
    }
}

impl<'de> Deserialize<'de> for AxisScale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            axis: Axis,
            factor: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        AxisScale::new(raw.axis, raw.factor).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} units/px", self.axis, self.factor)
    }
}

/// Two reference clicks plus the physical length between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRequest {
    pub ref_a: PixelPoint,
    pub ref_b: PixelPoint,
    pub axis: Axis,
    pub reference_length: f64,
}

impl CalibrationRequest {
    pub fn new(ref_a: PixelPoint, ref_b: PixelPoint, axis: Axis, reference_length: f64) -> Self {
        Self {
            ref_a,
            ref_b,
            axis,
            reference_length,
        }
    }

    /// Signed pixel distance `ref_b - ref_a` along the calibrated axis
    pub fn pixel_span(&self) -> f64 {
        self.ref_b.along(self.axis) - self.ref_a.along(self.axis)
    }

    pub fn calibrate(&self) -> DigitizeResult<AxisScale> {
        calibrate(self.ref_a, self.ref_b, self.axis, self.reference_length)
    }

    /// Calibrate and keep the numbers needed to show the user what was picked
    pub fn report(&self) -> DigitizeResult<CalibrationReport> {
        Ok(self.report_with(self.calibrate()?))
    }

    /// Summary for a scale already derived from this request
    pub fn report_with(&self, scale: AxisScale) -> CalibrationReport {
        CalibrationReport {
            axis: self.axis,
            pixel_span: self.pixel_span(),
            reference_length: self.reference_length,
            scale,
        }
    }
}

/// Compute the units-per-pixel factor for one axis.
///
/// Only the component of the two clicks along `axis` matters; the other
/// component is ignored, so a slightly slanted click pair still calibrates.
/// A negative `reference_length` or reversed clicks give a negative factor,
/// which flips that axis.
pub fn calibrate(
    ref_a: PixelPoint,
    ref_b: PixelPoint,
    axis: Axis,
    reference_length: f64,
) -> DigitizeResult<AxisScale> {
    if !reference_length.is_finite() {
        return Err(DigitizeError::InvalidReferenceLength(reference_length));
    }

    let (a, b) = (ref_a.along(axis), ref_b.along(axis));
    // compare before subtracting: two equal infinite clicks give `inf - inf = NaN`
    if a == b {
        return Err(DigitizeError::DegenerateCalibration { axis, coordinate: a });
    }
    let delta = b - a;

    // NaN or infinite clicks and a zero length end up here
    let scale = AxisScale::new(axis, reference_length / delta)?;
    tracing::debug!(
        %axis,
        delta_px = delta,
        reference_length,
        factor = scale.factor(),
        "axis calibrated"
    );
    Ok(scale)
}

/// Summary of a finished calibration, for the confirmation message
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub axis: Axis,
    pub pixel_span: f64,
    pub reference_length: f64,
    pub scale: AxisScale,
}

impl fmt::Display for CalibrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You selected {:4.0} pixels in {} direction corresponding to {:4.4} units",
            self.pixel_span, self.axis, self.reference_length
        )
    }
}
