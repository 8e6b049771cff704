// Digitization script
// TOML description of the clicks a user made: two reference pairs and any number of curves

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use curvedigit_common::{Axis, ImageFrame, PixelPoint};
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationRequest;
use crate::clicks::{self, ClickEvent};
use crate::error::{DigitizeError, DigitizeResult};
use crate::transform::Curve;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitizeScript {
    /// Image the clicks were made on; only used to check bounds
    #[serde(default)]
    pub image: Option<PathBuf>,
    pub x_reference: ReferenceEntry,
    pub y_reference: ReferenceEntry,
    #[serde(default)]
    pub curves: Vec<CurveEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Start and end of the reference length, after undo/finish replay
    pub clicks: Vec<ClickEvent>,
    /// Physical length between the two clicks
    pub length: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveEntry {
    /// Used in the output file name; defaults to the curve's position
    #[serde(default)]
    pub name: Option<String>,
    pub clicks: Vec<ClickEvent>,
}

impl CurveEntry {
    pub fn curve(&self) -> Curve {
        clicks::record(&self.clicks)
    }
}

impl DigitizeScript {
    /// Parse a script. Curves must resolve to distinct output names so no
    /// curve's file overwrites another's.
    pub fn from_toml(content: &str) -> DigitizeResult<Self> {
        let script: Self = toml::from_str(content)?;
        script.check_unique_names()?;
        Ok(script)
    }

    fn check_unique_names(&self) -> DigitizeResult<()> {
        let mut seen = HashSet::new();
        for index in 0..self.curves.len() {
            let name = self.curve_name(index);
            if !seen.insert(name.clone()) {
                return Err(DigitizeError::Script(format!(
                    "curve {} resolves to output name '{}', already used by an earlier curve",
                    index + 1,
                    name
                )));
            }
        }
        Ok(())
    }

    /// Build the calibration request for one axis
    pub fn reference(&self, axis: Axis) -> DigitizeResult<CalibrationRequest> {
        let entry = match axis {
            Axis::X => &self.x_reference,
            Axis::Y => &self.y_reference,
        };
        let (ref_a, ref_b) = clicks::reference_pair(&entry.clicks).ok_or_else(|| {
            DigitizeError::Script(format!(
                "{} reference needs exactly two clicks, got {}",
                axis,
                clicks::record(&entry.clicks).len()
            ))
        })?;
        Ok(CalibrationRequest::new(ref_a, ref_b, axis, entry.length))
    }

    /// Output name for the curve at `index`
    pub fn curve_name(&self, index: usize) -> String {
        self.curves
            .get(index)
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| format!("{}", index + 1))
    }

    /// Every recorded point (reference and curve clicks) outside `frame`
    pub fn points_outside(&self, frame: &ImageFrame) -> Vec<PixelPoint> {
        let references = [&self.x_reference.clicks, &self.y_reference.clicks];
        let curves = self.curves.iter().map(|c| &c.clicks);

        references
            .into_iter()
            .chain(curves)
            .flat_map(|events| clicks::record(events).points().to_vec())
            .filter(|p| !frame.contains(*p))
            .collect()
    }
}

pub fn load_script(path: impl AsRef<Path>) -> DigitizeResult<DigitizeScript> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let script = DigitizeScript::from_toml(&content)?;
    tracing::info!(
        path = %path.display(),
        curves = script.curves.len(),
        "digitization script loaded"
    );
    Ok(script)
}
