//! Size strings reported by inventory probes.
//!
//! Memory arrives as `"<int> MB"`. Disk sizes use the single-letter suffixes
//! printed by `df -h`: `T`, `G` and `M`. Everything is normalised to whole
//! megabytes (memory) or whole gigabytes (disk), truncating fractions.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum UnitError {
    #[error("invalid memory value: {0:?}")]
    InvalidMemory(String),
    #[error("invalid disk size: {0:?}")]
    InvalidDiskSize(String),
}

/// Parse a memory string such as `"16384 MB"` into megabytes.
///
/// The ` MB` unit is optional; a bare integer is accepted as megabytes.
pub fn parse_megabytes(value: &str) -> Result<u64, UnitError> {
    value
        .replace(" MB", "")
        .trim()
        .parse()
        .map_err(|_| UnitError::InvalidMemory(value.to_string()))
}

/// Parse a disk size such as `"150G"`, `"1.5T"` or `"1500M"` into whole gigabytes.
///
/// `T` and `M` accept fractions; `G` must be an integer.
pub fn parse_disk_gb(value: &str) -> Result<u64, UnitError> {
    let invalid = || UnitError::InvalidDiskSize(value.to_string());
    let trimmed = value.trim();

    if let Some(tb) = trimmed.strip_suffix('T') {
        let tb = parse_fraction(tb).ok_or_else(invalid)?;
        Ok((tb * 1024.0) as u64)
    } else if let Some(gb) = trimmed.strip_suffix('G') {
        gb.trim().parse().map_err(|_| invalid())
    } else if let Some(mb) = trimmed.strip_suffix('M') {
        let mb = parse_fraction(mb).ok_or_else(invalid)?;
        Ok((mb / 1024.0) as u64)
    } else {
        Err(invalid())
    }
}

fn parse_fraction(number: &str) -> Option<f64> {
    let parsed: f64 = number.trim().parse().ok()?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}
