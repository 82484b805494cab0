//! Checks used by strict element string building.

/// GS1 mod-10 check digit for a digit string without its check digit.
///
/// Weights alternate 3, 1, 3, ... starting from the rightmost digit.
pub fn check_digit(body: &str) -> Option<u8> {
    let mut sum = 0u32;
    for (i, b) in body.bytes().rev().enumerate() {
        if !b.is_ascii_digit() {
            return None;
        }
        let digit = (b - b'0') as u32;
        sum += if i % 2 == 0 { digit * 3 } else { digit };
    }
    Some(((10 - sum % 10) % 10) as u8)
}

/// Whether a GTIN-8/12/13/14 carries a correct check digit.
pub fn is_valid_gtin(gtin: &str) -> bool {
    if !matches!(gtin.len(), 8 | 12 | 13 | 14) {
        return false;
    }
    let (body, check) = gtin.split_at(gtin.len() - 1);
    match (check_digit(body), check.bytes().next()) {
        (Some(expected), Some(actual)) => actual.is_ascii_digit() && expected == actual - b'0',
        _ => false,
    }
}

/// Whether a character is in GS1 AI encodable character set 82.
pub fn is_cset82(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '!' | '"'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | '+'
                | ','
                | '-'
                | '.'
                | '/'
                | ':'
                | ';'
                | '<'
                | '='
                | '>'
                | '?'
                | '_'
        )
}
