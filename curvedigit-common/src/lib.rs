//! Value types shared by the digitizer library and its command-line host.

mod types;

pub use types::{Axis, ImageFrame, OutputFormat, PhysicalPoint, PixelPoint};
