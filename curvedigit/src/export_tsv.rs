// Delimited text export module
// One `x<delimiter>y` row per point, numbers in scientific notation

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use curvedigit_common::PhysicalPoint;

use crate::error::DigitizeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TsvOptions {
    pub delimiter: char,
    /// Digits after the decimal point of the mantissa
    pub precision: usize,
}

impl Default for TsvOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            precision: 18,
        }
    }
}

/// Export a digitized curve to a delimited text file
pub fn export_tsv(
    points: &[PhysicalPoint],
    output_path: impl AsRef<Path>,
    options: &TsvOptions,
) -> DigitizeResult<()> {
    let output_path = output_path.as_ref();
    let mut file = BufWriter::new(File::create(output_path)?);
    write_tsv(&mut file, points, options)?;
    file.flush()?;

    tracing::info!(
        path = %output_path.display(),
        points = points.len(),
        "curve exported as delimited text"
    );
    Ok(())
}

pub fn write_tsv<W: Write>(
    out: &mut W,
    points: &[PhysicalPoint],
    options: &TsvOptions,
) -> DigitizeResult<()> {
    for pt in points {
        writeln!(
            out,
            "{}{}{}",
            format_sci(pt.x, options.precision),
            options.delimiter,
            format_sci(pt.y, options.precision)
        )?;
    }
    Ok(())
}

/// Scientific notation with a signed, at least two digit exponent,
/// e.g. `1.000e+01`. Non-finite values print as `nan`, `inf`, `-inf`.
pub fn format_sci(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Rust prints `1.5e1` / `1.5e-3`; widen the exponent
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}
