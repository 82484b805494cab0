//! # Linear Symbol Encoder
//!
//! Turns a numeric string into a sequence of bar/space modules that POS
//! scanners in the test lab read as a plain numeric code.
//!
//! ## Layout
//!
//! ```text
//! ├ quiet 14 ┼ guard 6 ┼──── digits: 11 × bar_width each ────┼ guard 6 ┼ quiet 14 ┤
//!              █ █       ███ █ ██ ░░░░  ██ ██ █ ░░░░  ...         █ █
//! ```
//!
//! Each digit is a 7-bit pattern (1 = bar, 0 = space, each `bar_width`
//! units wide) followed by a 4-module separator, so every digit occupies
//! exactly `11 * bar_width` units. Guards and quiet zones are fixed, giving:
//!
//! ```text
//! width = digits * 11 * bar_width + 40
//! ```
//!
//! No check digit is computed or verified. This is a display approximation
//! of a linear symbology, kept bit-stable so existing scan fixtures keep
//! matching.
//!
//! ```
//! use scanbook::symbol::linear;
//!
//! let symbol = linear::encode("05100006007", 80);
//! assert_eq!(symbol.width(), 282);
//! assert_eq!(symbol.display_text, "05100006007");
//! ```

use crate::render::Raster;

/// 7-bit module patterns for digits 0-9, most significant bit drawn first.
const DIGIT_PATTERNS: [u8; 10] = [
    0b0001101, // 0
    0b0011001, // 1
    0b0010011, // 2
    0b0111101, // 3
    0b0100011, // 4
    0b0110001, // 5
    0b0101111, // 6
    0b0111011, // 7
    0b0110111, // 8
    0b0001011, // 9
];

/// Bits per digit pattern.
const PATTERN_BITS: usize = 7;

/// Separator modules after each digit pattern.
const DIGIT_GAP_MODULES: usize = 4;

/// Modules per digit (pattern + separator).
pub const MODULES_PER_DIGIT: usize = PATTERN_BITS + DIGIT_GAP_MODULES;

/// Width of each guard bar and the gap between them, in units.
const GUARD_UNIT: usize = 2;

/// Quiet zone on each side, in units.
const QUIET_ZONE: usize = 14;

/// Everything that doesn't depend on the data: both quiet zones and guards.
pub const FIXED_MARGIN: usize = 2 * QUIET_ZONE + 2 * (3 * GUARD_UNIT);

/// Gap between the bars and the human-readable text.
const TEXT_GAP: usize = 2;

/// Rendering parameters for linear symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinearOptions {
    /// Width of one module in units (pixels when rasterized)
    pub bar_width: usize,
    /// Height of the bars in pixels
    pub bar_height: usize,
    /// Height reserved under the bars for the display text
    pub text_height: usize,
}

impl LinearOptions {
    /// Defaults used by the catalog views: 2-unit modules, 80px bars.
    pub const DEFAULT: Self = Self {
        bar_width: 2,
        bar_height: 80,
        text_height: 20,
    };

    /// Override the bar height, keeping other defaults.
    pub fn with_bar_height(mut self, bar_height: usize) -> Self {
        self.bar_height = bar_height.max(1);
        self
    }

    /// Override the module width. Zero is bumped to 1.
    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width.max(1);
        self
    }
}

impl Default for LinearOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One bar or space of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Module {
    pub is_bar: bool,
    pub width: usize,
}

impl Module {
    const fn bar(width: usize) -> Self {
        Self { is_bar: true, width }
    }

    const fn space(width: usize) -> Self {
        Self {
            is_bar: false,
            width,
        }
    }
}

/// An encoded linear symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearSymbol {
    /// Bars and spaces from the left quiet zone to the right quiet zone
    pub modules: Vec<Module>,
    /// The original, unstripped input value
    pub display_text: String,
    /// Digits actually encoded
    pub digits: String,
    pub options: LinearOptions,
}

/// Encode a value with default options and the given bar height.
pub fn encode(value: &str, bar_height: usize) -> LinearSymbol {
    encode_with(value, &LinearOptions::DEFAULT.with_bar_height(bar_height))
}

/// Encode a value with explicit options.
///
/// Non-digit characters are dropped. An input with no digits at all is
/// encoded as `"0"` so callers always get a scannable symbol.
pub fn encode_with(value: &str, options: &LinearOptions) -> LinearSymbol {
    let mut digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        digits.push('0');
    }

    let bar_width = options.bar_width.max(1);
    let mut modules = Vec::with_capacity(digits.len() * (PATTERN_BITS + 1) + 8);

    modules.push(Module::space(QUIET_ZONE));
    push_guard(&mut modules);

    for digit in digits.bytes() {
        let pattern = DIGIT_PATTERNS[(digit - b'0') as usize];
        for bit in (0..PATTERN_BITS).rev() {
            if (pattern >> bit) & 1 == 1 {
                modules.push(Module::bar(bar_width));
            } else {
                modules.push(Module::space(bar_width));
            }
        }
        modules.push(Module::space(DIGIT_GAP_MODULES * bar_width));
    }

    push_guard(&mut modules);
    modules.push(Module::space(QUIET_ZONE));

    LinearSymbol {
        modules,
        display_text: value.to_string(),
        digits,
        options: LinearOptions {
            bar_width,
            ..*options
        },
    }
}

fn push_guard(modules: &mut Vec<Module>) {
    modules.push(Module::bar(GUARD_UNIT));
    modules.push(Module::space(GUARD_UNIT));
    modules.push(Module::bar(GUARD_UNIT));
}

impl LinearSymbol {
    /// Total width in units, quiet zones included.
    pub fn width(&self) -> usize {
        self.digits.len() * MODULES_PER_DIGIT * self.options.bar_width + FIXED_MARGIN
    }

    /// Total height: bars plus the text band.
    pub fn height(&self) -> usize {
        self.options.bar_height + self.options.text_height
    }

    /// Paint the symbol onto a new raster sized by [`width`](Self::width)
    /// and [`height`](Self::height).
    pub fn rasterize(&self) -> Raster {
        let mut raster = Raster::new(self.width(), self.height());

        let mut x = 0;
        for module in &self.modules {
            if module.is_bar {
                raster.fill_rect(x, 0, module.width, self.options.bar_height);
            }
            x += module.width;
        }

        if self.options.text_height > 0 {
            raster.draw_text_centered(self.options.bar_height + TEXT_GAP, &self.display_text);
        }

        raster
    }

    /// Expand modules to one bool per unit (true = bar).
    pub fn to_bars(&self) -> Vec<bool> {
        let mut bars = Vec::with_capacity(self.width());
        for module in &self.modules {
            bars.extend(std::iter::repeat_n(module.is_bar, module.width));
        }
        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_margin() {
        assert_eq!(FIXED_MARGIN, 40);
    }

    #[test]
    fn test_module_widths_sum_to_width() {
        let symbol = encode("012345", 60);
        let total: usize = symbol.modules.iter().map(|m| m.width).sum();
        assert_eq!(total, symbol.width());
        assert_eq!(symbol.to_bars().len(), symbol.width());
    }

    #[test]
    fn test_guards_are_data_independent() {
        let a = encode("1", 60);
        let b = encode("9", 60);
        assert_eq!(a.modules[..4], b.modules[..4]);
        assert_eq!(a.modules[a.modules.len() - 4..], b.modules[b.modules.len() - 4..]);
        assert_eq!(
            a.modules[1..4],
            [Module::bar(2), Module::space(2), Module::bar(2)]
        );
    }

    #[test]
    fn test_digit_pattern_zero() {
        let symbol = encode("0", 60);
        // quiet + 3 guard modules, then 7 pattern bits, then separator
        let data: Vec<bool> = symbol.modules[4..11].iter().map(|m| m.is_bar).collect();
        assert_eq!(data, [false, false, false, true, true, false, true]);
        assert_eq!(symbol.modules[11], Module::space(8));
    }

    #[test]
    fn test_non_digits_stripped_but_displayed() {
        let symbol = encode("051-000 06007", 80);
        assert_eq!(symbol.digits, "05100006007");
        assert_eq!(symbol.display_text, "051-000 06007");
        assert_eq!(symbol.width(), 282);
    }

    #[test]
    fn test_empty_renders_zero() {
        let empty = encode("", 80);
        let zero = encode("0", 80);
        assert_eq!(empty.modules, zero.modules);
        assert_eq!(empty.digits, "0");
        assert_eq!(empty.display_text, "");
    }

    #[test]
    fn test_letters_only_renders_zero() {
        let symbol = encode("ABC", 80);
        assert_eq!(symbol.digits, "0");
        assert_eq!(symbol.display_text, "ABC");
    }

    #[test]
    fn test_rasterize_dimensions() {
        let symbol = encode("123", 50);
        let raster = symbol.rasterize();
        assert_eq!(raster.width(), 3 * 11 * 2 + 40);
        assert_eq!(raster.height(), 70);
        // First guard bar starts right after the quiet zone
        assert!(!raster.is_black(13, 10));
        assert!(raster.is_black(14, 10));
        assert!(raster.is_black(15, 10));
        assert!(!raster.is_black(16, 10));
    }

    #[test]
    fn test_bar_width_option() {
        let options = LinearOptions::DEFAULT.with_bar_width(3);
        let symbol = encode_with("12", &options);
        assert_eq!(symbol.width(), 2 * 11 * 3 + 40);
    }
}
