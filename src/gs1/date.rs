//! GS1 date fields (AI 11, 15, 16, 17).
//!
//! Form inputs are ISO `YYYY-MM-DD`; the element string carries `YYMMDD`.
//! Going back from `YYMMDD` uses the GS1 sliding century window: a year more
//! than 50 years ahead of the reference year belongs to the previous century,
//! and one more than 49 years behind belongs to the next.

use chrono::{Datelike, NaiveDate};

/// Characters removed from a date input before truncation.
const SEPARATORS: [char; 4] = ['-', '/', '.', ' '];

/// Why a strict date conversion failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateProblem {
    /// Not a calendar-valid `YYYY-MM-DD` date
    Malformed,
    /// The year can't be recovered from `YYMMDD` relative to the reference date
    OutsideCenturyWindow { year: i32 },
}

/// Lenient conversion: strip separators, keep the last six characters.
///
/// `"2025-12-15"` becomes `"251215"`. Inputs shorter than six characters or
/// with anything but digits left after stripping yield `None`. The century is
/// dropped without checking.
pub fn lenient_yymmdd(input: &str) -> Option<String> {
    let compact: Vec<char> = input
        .trim()
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect();
    if compact.len() < 6 {
        return None;
    }
    let tail: String = compact[compact.len() - 6..].iter().collect();
    tail.bytes().all(|b| b.is_ascii_digit()).then_some(tail)
}

/// Strict conversion: the input must be a real `YYYY-MM-DD` date whose year
/// survives the trip through `YYMMDD` under the GS1 century window.
pub fn strict_yymmdd(input: &str, reference: NaiveDate) -> Result<String, DateProblem> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| DateProblem::Malformed)?;
    let yymmdd = date.format("%y%m%d").to_string();

    match expand_yymmdd(&yymmdd, reference) {
        Some(expanded) if expanded == date => Ok(yymmdd),
        _ => Err(DateProblem::OutsideCenturyWindow { year: date.year() }),
    }
}

/// Recover the full date from `YYMMDD`.
///
/// A day of `00` means the last day of the month.
pub fn expand_yymmdd(yymmdd: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if yymmdd.len() != 6 || !yymmdd.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = yymmdd[0..2].parse().ok()?;
    let mm: u32 = yymmdd[2..4].parse().ok()?;
    let dd: u32 = yymmdd[4..6].parse().ok()?;

    let ref_year = reference.year();
    let century = ref_year - ref_year.rem_euclid(100);
    let diff = yy - ref_year.rem_euclid(100);
    let year = if (51..=99).contains(&diff) {
        century - 100 + yy
    } else if (-99..=-50).contains(&diff) {
        century + 100 + yy
    } else {
        century + yy
    };

    if dd == 0 {
        return last_day_of_month(year, mm);
    }
    NaiveDate::from_ymd_opt(year, mm, dd)
}

/// `YYMMDD` back to ISO `YYYY-MM-DD`, for refilling edit forms.
pub fn to_iso(yymmdd: &str, reference: NaiveDate) -> Option<String> {
    expand_yymmdd(yymmdd, reference).map(|d| d.format("%Y-%m-%d").to_string())
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
