use itertools::Itertools;
use std::iter;

/// Significant digits printed for a number.
const SIGNIFICANT_DIGITS: i32 = 14;

/// Default width of an error excerpt, caret line included.
pub const EXCERPT_WIDTH: usize = 80;

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Formats a number the way `%.14g` would: fixed notation for moderate
/// magnitudes, scientific notation otherwise, without trailing zeros.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "nan".into();
    }

    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.into();
    }

    if x == 0.0 {
        return "0".into();
    }

    let exponent = x.abs().log10().floor() as i32;

    if exponent < -5 || exponent >= SIGNIFICANT_DIGITS {
        let text = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, x);

        match text.find('e') {
            Some(index) => format!("{}{}", trim_zeros(&text[..index]), &text[index..]),
            None => text,
        }
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

/// Renders `line` with a `^` under the 1-based `column`, keeping both lines
/// within `width` characters. Long lines are cut around the column.
pub fn excerpt(line: &str, column: usize, width: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let width = width.max(1);
    let offset = column.max(1) - 1;

    let start = if chars.len() < width {
        0
    } else {
        offset
            .saturating_sub(width / 2)
            .min((chars.len() + 1).saturating_sub(width))
    };
    let end = chars.len().min(start + width);

    let text: String = chars[start..end].iter().collect();
    let marker = iter::repeat(' ').take(offset - start).join("");

    format!("{}\n{}^", text, marker)
}
