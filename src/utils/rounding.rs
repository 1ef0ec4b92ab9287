//! Exact integer rounding used by the engines, so results never depend on
//! floating point representation.

/// Divides and rounds to the nearest integer, halves away from zero.
///
/// Returns `None` when `denom` is zero.
pub fn div_round(numer: i128, denom: i128) -> Option<i128> {
    if denom == 0 {
        return None;
    }
    let (numer, denom) = if denom < 0 {
        (-numer, -denom)
    } else {
        (numer, denom)
    };
    let magnitude = (2 * numer.abs() + denom) / (2 * denom);
    Some(if numer < 0 { -magnitude } else { magnitude })
}

/// Rounds `numer / denom` to the nearest multiple of `unit`.
pub fn round_to_unit(numer: i64, denom: i64, unit: i64) -> Option<i64> {
    let unit = unit.max(1) as i128;
    div_round(numer as i128, denom as i128 * unit).map(|steps| (steps * unit) as i64)
}

/// `part / whole` as a rounded whole percentage, or `None` when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> Option<i64> {
    div_round(part as i128 * 100, whole as i128).map(|value| value as i64)
}
