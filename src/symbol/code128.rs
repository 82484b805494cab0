//! # GS1-128
//!
//! Code128 with FNC1 right after the start character and in place of every
//! GS separator, so scanners report the AI data instead of plain text.
//! Digit runs go in code set C, everything else in set B.

use super::MatrixSymbology;
use super::backend::BackendError;
use crate::gs1::GROUP_SEPARATOR;

/// Symbol patterns for values 0..=105, most significant bit first.
/// Each is 11 modules: three bars and three spaces.
const PATTERNS: [u16; 106] = [
    0b11011001100, 0b11001101100, 0b11001100110, 0b10010011000, 0b10010001100, 0b10001001100,
    0b10011001000, 0b10011000100, 0b10001100100, 0b11001001000, 0b11001000100, 0b11000100100,
    0b10110011100, 0b10011011100, 0b10011001110, 0b10111001100, 0b10011101100, 0b10011100110,
    0b11001110010, 0b11001011100, 0b11001001110, 0b11011100100, 0b11001110100, 0b11101101110,
    0b11101001100, 0b11100101100, 0b11100100110, 0b11101100100, 0b11100110100, 0b11100110010,
    0b11011011000, 0b11011000110, 0b11000110110, 0b10100011000, 0b10001011000, 0b10001000110,
    0b10110001000, 0b10001101000, 0b10001100010, 0b11010001000, 0b11000101000, 0b11000100010,
    0b10110111000, 0b10110001110, 0b10001101110, 0b10111011000, 0b10111000110, 0b10001110110,
    0b11101110110, 0b11010001110, 0b11000101110, 0b11011101000, 0b11011100010, 0b11011101110,
    0b11101011000, 0b11101000110, 0b11100010110, 0b11101101000, 0b11101100010, 0b11100011010,
    0b11101111010, 0b11001000010, 0b11110001010, 0b10100110000, 0b10100001100, 0b10010110000,
    0b10010000110, 0b10000101100, 0b10000100110, 0b10110010000, 0b10110000100, 0b10011010000,
    0b10011000010, 0b10000110100, 0b10000110010, 0b11000010010, 0b11001010000, 0b11110111010,
    0b11000010100, 0b10001111010, 0b10100111100, 0b10010111100, 0b10010011110, 0b10111100100,
    0b10011110100, 0b10011110010, 0b11110100100, 0b11110010100, 0b11110010010, 0b11011011110,
    0b11011110110, 0b11110110110, 0b10101111000, 0b10100011110, 0b10001011110, 0b10111101000,
    0b10111100010, 0b11110101000, 0b11110100010, 0b10111011110, 0b10111101110, 0b11101011110,
    0b11110101110, 0b11010000100, 0b11010010000, 0b11010011100,
];

/// The stop pattern is 13 modules.
const STOP: u16 = 0b1100011101011;
const STOP_MODULES: usize = 13;
const SYMBOL_MODULES: usize = 11;

const CODE_C: usize = 99;
const CODE_B: usize = 100;
const FNC1: usize = 102;
const START_B: usize = 104;
const START_C: usize = 105;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    B,
    C,
}

/// Bars for a GS-separated element string.
pub fn encode(payload: &str) -> Result<Vec<bool>, BackendError> {
    let codes = symbol_values(payload).map_err(|c| BackendError::Encode {
        symbology: MatrixSymbology::Code128,
        reason: format!("{:?} is not encodable in GS1-128", c),
    })?;

    let mut bars = Vec::with_capacity(codes.len() * SYMBOL_MODULES + STOP_MODULES);
    for code in codes {
        push_pattern(&mut bars, PATTERNS[code], SYMBOL_MODULES);
    }
    push_pattern(&mut bars, STOP, STOP_MODULES);
    Ok(bars)
}

/// Symbol values from the start character through the check symbol.
/// Fails with the first character code sets B and C can't carry.
fn symbol_values(payload: &str) -> Result<Vec<usize>, char> {
    let chars: Vec<char> = payload.chars().collect();
    let mut set = if digit_run(&chars, 0) >= 4 {
        CodeSet::C
    } else {
        CodeSet::B
    };
    let mut codes = vec![
        match set {
            CodeSet::B => START_B,
            CodeSet::C => START_C,
        },
        FNC1,
    ];

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == GROUP_SEPARATOR {
            codes.push(FNC1);
            i += 1;
            continue;
        }
        match set {
            CodeSet::C if digit_run(&chars, i) >= 2 => {
                codes.push(digit(chars[i]) * 10 + digit(chars[i + 1]));
                i += 2;
            }
            CodeSet::C => {
                codes.push(CODE_B);
                set = CodeSet::B;
            }
            CodeSet::B if digit_run(&chars, i) >= 4 => {
                codes.push(CODE_C);
                set = CodeSet::C;
            }
            CodeSet::B => {
                if !(' '..='~').contains(&c) {
                    return Err(c);
                }
                codes.push(c as usize - ' ' as usize);
                i += 1;
            }
        }
    }

    // Start character and first symbol both weigh 1
    let sum: usize = codes
        .iter()
        .enumerate()
        .map(|(pos, &value)| value * pos.max(1))
        .sum();
    codes.push(sum % 103);
    Ok(codes)
}

fn digit_run(chars: &[char], from: usize) -> usize {
    chars[from.min(chars.len())..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count()
}

fn digit(c: char) -> usize {
    (c as u8 - b'0') as usize
}

fn push_pattern(bars: &mut Vec<bool>, pattern: u16, modules: usize) {
    for bit in (0..modules).rev() {
        bars.push((pattern >> bit) & 1 == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_patterns_have_even_bar_modules() {
        for (value, pattern) in PATTERNS.iter().enumerate() {
            assert_eq!(pattern.count_ones() % 2, 0, "value {}", value);
            assert_eq!(pattern >> 10, 1, "value {} must start with a bar", value);
        }
    }

    #[test]
    fn test_gtin_uses_set_c() {
        // (01)00012345678905
        assert_eq!(
            symbol_values("0100012345678905").unwrap(),
            vec![START_C, FNC1, 1, 0, 1, 23, 45, 67, 89, 5, 73]
        );
    }

    #[test]
    fn test_separator_becomes_fnc1() {
        let codes = symbol_values("10AB\u{1d}21S1").unwrap();
        assert_eq!(codes[..2], [START_B, FNC1]);
        // 1 0 A B FNC1 2 1 S 1
        assert_eq!(codes[2..11], [17, 16, 33, 34, FNC1, 18, 17, 51, 17]);
    }

    #[test]
    fn test_short_digit_tail_switches_back_to_b() {
        let codes = symbol_values("12345").unwrap();
        // C: 12 34, then B: 5
        assert_eq!(codes[..5], [START_C, FNC1, 12, 34, CODE_B]);
        assert_eq!(codes[5], 21);
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert_eq!(symbol_values("10Ä"), Err('Ä'));
        assert!(encode("10Ä").is_err());
    }

    #[test]
    fn test_bars_end_with_stop() {
        let bars = encode("0100012345678905").unwrap();
        assert_eq!(bars.len(), 11 * SYMBOL_MODULES + STOP_MODULES);
        assert!(bars[0]);
        assert!(bars[bars.len() - 1]);
    }
}
