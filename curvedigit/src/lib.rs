//! Curve digitizer core.
//!
//! Turns clicked pixel positions on a plotted curve into data coordinates:
//!
//! 1. **Calibration** – two reference clicks plus a known physical length give
//!    a units-per-pixel [`AxisScale`] for each axis.
//! 2. **Transform** – every curve is mapped element-wise with the fixed scale
//!    pair, anchored so its first click lands on `(0, 0)`.
//! 3. **Session** – [`DigitizerSession`] enforces the order: x, then y, then
//!    any number of curves.
//!
//! Click capture, script loading and file export are thin collaborators
//! around that core and are used by the `curvedigit` binary.

pub mod calibration;
pub mod clicks;
pub mod error;
pub mod export_json;
pub mod export_tsv;
pub mod script;
pub mod session;
pub mod transform;

pub use calibration::{calibrate, AxisScale, CalibrationReport, CalibrationRequest};
pub use clicks::{ClickEvent, ClickRecorder};
pub use error::{DigitizeError, DigitizeResult};
pub use export_json::export_json;
pub use export_tsv::{export_tsv, format_sci, TsvOptions};
pub use script::{load_script, DigitizeScript};
pub use session::{DigitizerSession, SessionState};
pub use transform::{transform, transform_curve, Curve};

pub use curvedigit_common::{Axis, ImageFrame, OutputFormat, PhysicalPoint, PixelPoint};
