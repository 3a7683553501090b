#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumberError {
    #[error("number has no length")]
    Empty,
    #[error("invalid number, just a - sign")]
    BareSign,
    #[error("decimal point with no value at the end")]
    TrailingPoint,
    #[error("malformed number")]
    Malformed,
}

/// Characters that may appear in a numeric literal after its sign.
pub fn is_numeric(ch: char) -> bool {
    matches!(ch, '0'..='9' | '.' | ',')
}

/// Parses a literal the way source words and text input are read:
/// an optional leading `-`, and `,` or `.` as the decimal point.
pub fn parse_number(word: &str) -> Result<f64, NumberError> {
    match word {
        "" => return Err(NumberError::Empty),
        "-" => return Err(NumberError::BareSign),
        _ if word.ends_with(['.', ',']) => return Err(NumberError::TrailingPoint),
        _ => (),
    }
    word.replace(',', ".")
        .parse()
        .map_err(|_| NumberError::Malformed)
}

/// Renders a number for print-as-number output.
///
/// Plain notation for decimal exponents in `-4..21`, otherwise scientific
/// with a signed exponent of at least two digits (`1e+21`, `1.5e-07`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "+Inf" } else { "-Inf" }.to_owned();
    }
    let sci = format!("{n:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return format!("{n}");
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..21).contains(&exp) {
        return format!("{n}");
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        assert_eq!(parse_number("5"), Ok(5.0));
        assert_eq!(parse_number("-12"), Ok(-12.0));
        assert_eq!(parse_number("3,25"), Ok(3.25));
        assert_eq!(parse_number(".5"), Ok(0.5));
        assert_eq!(parse_number("-,5"), Ok(-0.5));
        assert_eq!(parse_number(""), Err(NumberError::Empty));
        assert_eq!(parse_number("-"), Err(NumberError::BareSign));
        assert_eq!(parse_number("4."), Err(NumberError::TrailingPoint));
        assert_eq!(parse_number("4,"), Err(NumberError::TrailingPoint));
        assert_eq!(parse_number("1.2.3"), Err(NumberError::Malformed));
        assert_eq!(parse_number("1,2.3"), Err(NumberError::Malformed));
    }

    #[test]
    fn rendering() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "-0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-3.5), "-3.5");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(0.000015), "1.5e-05");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(format_number(f64::INFINITY), "+Inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}
