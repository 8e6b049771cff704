// JSON export module
// Pretty-printed array of {"x", "y"} objects in physical units

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use curvedigit_common::PhysicalPoint;

use crate::error::DigitizeResult;

/// Export a digitized curve to a JSON file.
/// Non-finite coordinates are written as `null`.
pub fn export_json(points: &[PhysicalPoint], output_path: impl AsRef<Path>) -> DigitizeResult<()> {
    let output_path = output_path.as_ref();
    let mut file = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut file, points)?;
    writeln!(file)?;
    file.flush()?;

    tracing::info!(
        path = %output_path.display(),
        points = points.len(),
        "curve exported as JSON"
    );
    Ok(())
}
