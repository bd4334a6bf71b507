//! Numeric normalization of formatted field values.

/// Parses the leading signed integer of a formatted value.
/// `"3"` is 3, `"2.7"` is 2, `" 12 pcs"` is 12; no leading digits yields None.
pub(crate) fn parse_leading_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    let mut end = 0;
    for (index, char) in value.char_indices() {
        if char.is_ascii_digit() || (index == 0 && (char == '-' || char == '+')) {
            end = index + char.len_utf8();
        } else {
            break;
        }
    }
    value[..end].parse::<i64>().ok()
}

/// Longest prefix of `value` that reads as a decimal number: sign, digits,
/// fraction and exponent. Empty when no digit leads the value.
fn leading_decimal(value: &str) -> &str {
    let bytes = value.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|byte| byte.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits(end);
    end += integer;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits(end + 1);
        if integer + fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer + fraction == 0 {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    &value[..end]
}

/// Converts a comma-decimal weight to a period-decimal string with four fractional digits.
///
/// Only the leading number is read, so `"12,5 kg"` is `12.5000`. Halfway values
/// round away from zero. Returns None when no number leads the value.
pub(crate) fn normalize_weight(value: &str) -> Option<String> {
    let value = value.trim().replacen(',', ".", 1);
    let weight = leading_decimal(&value).parse::<f64>().ok().filter(|weight| weight.is_finite())?;
    let scaled = weight * 10_000.0;
    // Exact halves only exist for multiples of 1/32, where the scaling is exact.
    let weight = if (weight * 32.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        scaled.round() / 10_000.0
    } else {
        weight
    };
    Some(format!("{weight:.4}"))
}

/// Package count of a label, as printed next to its noun.
pub(crate) fn parse_pcb(value: &str) -> Option<i64> {
    parse_leading_integer(value)
}

/// Grammatical number selected by a package count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Plurality {
    Singular,
    Plural,
}

impl Plurality {
    /// Exactly one package is singular, anything else (zero, many, unknown) is plural.
    pub(crate) fn of(count: Option<i64>) -> Self {
        match count {
            Some(1) => Plurality::Singular,
            _ => Plurality::Plural,
        }
    }

    pub(crate) fn noun<'a>(&self, singular: &'a str, plural: &'a str) -> &'a str {
        match self {
            Plurality::Singular => singular,
            Plurality::Plural => plural,
        }
    }
}
