//! Adobe/Resolve .cube 1D LUT export and import.
//!
//! Lets a ramp be inspected in grading tools, or an externally authored
//! 256-entry curve be pushed to the display.
//!
//! # Format
//!
//! ```text
//! # Generated by lumen
//! TITLE "power 2.2"
//! LUT_1D_SIZE 256
//!
//! 0.000000 0.000000 0.000000
//! ...
//! 1.000000 1.000000 1.000000
//! ```
//!
//! Only 256-entry files over the default [0, 1] domain are accepted on
//! import; `DOMAIN_MIN`/`DOMAIN_MAX` lines are skipped.

use crate::{RampError, RampResult};
use lumen_core::{GammaRamp, RAMP_LEN, RAMP_MAX};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Formats a ramp as `.cube` text.
pub fn to_string(ramp: &GammaRamp, title: Option<&str>) -> String {
    let max = f64::from(RAMP_MAX);
    let mut out = String::with_capacity(RAMP_LEN * 30 + 64);

    out.push_str("# Generated by lumen\n");
    if let Some(title) = title {
        let _ = writeln!(out, "TITLE \"{}\"", title.replace('"', "'"));
    }
    let _ = writeln!(out, "LUT_1D_SIZE {RAMP_LEN}");
    out.push('\n');

    for i in 0..RAMP_LEN {
        let _ = writeln!(
            out,
            "{:.6} {:.6} {:.6}",
            f64::from(ramp.red[i]) / max,
            f64::from(ramp.green[i]) / max,
            f64::from(ramp.blue[i]) / max
        );
    }
    out
}

/// Writes a ramp to a `.cube` file.
///
/// # Example
///
/// ```rust,ignore
/// let ramp = RampBuilder::new().build(ToneCurveKind::Cinema, 1.0, None);
/// cube::write_1d("cinema.cube", &ramp, Some("cinema"))?;
/// ```
pub fn write_1d<P: AsRef<Path>>(path: P, ramp: &GammaRamp, title: Option<&str>) -> RampResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(to_string(ramp, title).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Reads a 256-entry ramp from a `.cube` file.
pub fn read_1d<P: AsRef<Path>>(path: P) -> RampResult<GammaRamp> {
    let file = File::open(path.as_ref())?;
    parse_1d(BufReader::new(file))
}

/// Parses a 256-entry ramp from a reader.
pub fn parse_1d<R: BufRead>(reader: R) -> RampResult<GammaRamp> {
    let mut size: Option<usize> = None;
    let mut rows: Vec<[u16; 3]> = Vec::with_capacity(RAMP_LEN);

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("TITLE") || line.starts_with("DOMAIN_MIN") || line.starts_with("DOMAIN_MAX") {
            continue;
        } else if let Some(rest) = line.strip_prefix("LUT_1D_SIZE") {
            let n: usize = rest
                .trim()
                .parse()
                .map_err(|_| RampError::InvalidRamp(format!("bad size: {line}")))?;
            size = Some(n);
        } else if line.starts_with("LUT_3D_SIZE") {
            return Err(RampError::InvalidRamp("expected 1D LUT, found 3D".into()));
        } else {
            rows.push(parse_row(line)?);
        }
    }

    let size = size.ok_or_else(|| RampError::InvalidRamp("missing LUT_1D_SIZE".into()))?;
    if size != RAMP_LEN || rows.len() != RAMP_LEN {
        return Err(RampError::InvalidRamp(format!(
            "expected {} entries, header says {} and file has {}",
            RAMP_LEN,
            size,
            rows.len()
        )));
    }

    let mut ramp = GammaRamp::zeroed();
    for (i, row) in rows.iter().enumerate() {
        ramp.red[i] = row[0];
        ramp.green[i] = row[1];
        ramp.blue[i] = row[2];
    }
    Ok(ramp)
}

fn parse_row(line: &str) -> RampResult<[u16; 3]> {
    let values: Vec<f64> = line
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| RampError::InvalidRamp(format!("bad data line: {line}")))?;

    match values.as_slice() {
        [r, g, b] => Ok([to_u16(*r), to_u16(*g), to_u16(*b)]),
        [v] => Ok([to_u16(*v); 3]),
        _ => Err(RampError::InvalidRamp(format!("expected 3 values: {line}"))),
    }
}

#[inline]
fn to_u16(v: f64) -> u16 {
    (v.clamp(0.0, 1.0) * f64::from(RAMP_MAX)).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RampBuilder;
    use lumen_core::ToneCurveKind;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_layout() {
        let text = to_string(&GammaRamp::identity(), Some("identity"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Generated by lumen");
        assert_eq!(lines[1], "TITLE \"identity\"");
        assert_eq!(lines[2], "LUT_1D_SIZE 256");
        assert_eq!(lines[4], "0.000000 0.000000 0.000000");
        assert_eq!(lines.last().copied(), Some("1.000000 1.000000 1.000000"));
        assert_eq!(lines.len(), 4 + 256);
    }

    #[test]
    fn test_file_roundtrip_within_precision() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cinema.cube");
        let ramp = RampBuilder::new().build(ToneCurveKind::Cinema, 1.0, None);

        write_1d(&path, &ramp, None).unwrap();
        let back = read_1d(&path).unwrap();
        // six decimals is about 0.07 of a 16-bit step
        assert!(back.matches_within(&ramp, 1));
    }

    #[test]
    fn test_rejects_wrong_size() {
        let text = "LUT_1D_SIZE 2\n0 0 0\n1 1 1\n";
        assert!(matches!(parse_1d(Cursor::new(text)), Err(RampError::InvalidRamp(_))));
        assert!(matches!(parse_1d(Cursor::new("LUT_3D_SIZE 17\n")), Err(RampError::InvalidRamp(_))));
        assert!(matches!(parse_1d(Cursor::new("0 0 0\n")), Err(RampError::InvalidRamp(_))));
    }

    #[test]
    fn test_mono_rows_accepted() {
        let mut text = String::from("LUT_1D_SIZE 256\n");
        for i in 0..256 {
            text.push_str(&format!("{}\n", i as f64 / 255.0));
        }
        let ramp = parse_1d(Cursor::new(text)).unwrap();
        assert!(ramp.is_mono());
        assert!(ramp.matches_within(&GammaRamp::identity(), 1));
    }
}
