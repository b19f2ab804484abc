/// Rounds `value` to `places` decimal places, half away from zero.
///
/// The scaling happens on the decimal representation of the number
/// (`"1.005e2"` instead of `1.005 * 100.0`), so values that look like an exact
/// half in decimal are rounded as such even if their binary representation is
/// slightly below it.
pub fn round_decimal(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let shifted = shift_decimal(value, places).round();
    shift_decimal(shifted, -places)
}

/// Rounds to three decimal places. Used for distances shown to the user.
pub fn round3(value: f64) -> f64 {
    round_decimal(value, 3)
}

fn shift_decimal(value: f64, exponent: i32) -> f64 {
    format!("{value}e{exponent}")
        .parse()
        .unwrap_or(value * 10f64.powi(exponent))
}
