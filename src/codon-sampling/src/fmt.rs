//! Significant-digit float formatting compatible with C's `printf("%.4g")`,
//! used for the ratio output rows.

/// Digits of precision carried by the ratio outputs.
pub const RATIO_PRECISION: usize = 4;

/// Format `value` with 4 significant digits, printf `%g` style: fixed
/// notation while the decimal exponent lies within `[-4, 4)`, scientific
/// notation (two-digit signed exponent) outside, trailing zeros stripped.
pub fn format_g4(value: f64) -> String {
    format_g(value, RATIO_PRECISION)
}

fn format_g(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return String::from("0")
    }
    if !value.is_finite() {
        return if value.is_nan() { String::from("nan") }
               else if value > 0.0 { String::from("inf") }
               else { String::from("-inf") }
    }

    // Let the exponential formatter round first: rounding can carry the
    // mantissa into the next decade (0.99995 -> 1.000e0), which changes the
    // style decision.
    let rounded = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = rounded.split_once('e').expect("Exponential format should contain 'e'");
    let exponent: i32 = exponent.parse().expect("Exponent should be an integer");

    if exponent < -4 || exponent >= precision as i32 {
        let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{value:.decimals$}");
        if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            fixed
        }
    }
}
