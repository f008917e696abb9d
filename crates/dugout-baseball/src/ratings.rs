// Rating normalizer.
//
// Converts the rating encodings found in league exports (1-5 stars, 20-80
// scouting grades, currency strings, "years left" annotations, raw counts)
// into canonical numbers. Every parser here is total: malformed or
// placeholder input maps to a documented default instead of an error.

use serde::{Deserialize, Serialize};

use crate::record::RawValue;

/// Bottom of the scouting scale.
pub const SCOUTING_MIN: f64 = 20.0;
/// Top of the scouting scale.
pub const SCOUTING_MAX: f64 = 80.0;
/// Largest value a star rating can take.
pub const STARS_MAX: f64 = 5.0;
/// Values at or below this are read as stars by the auto heuristic.
const STAR_HEURISTIC_CUTOFF: f64 = 10.0;

// ---------------------------------------------------------------------------
// Scales
// ---------------------------------------------------------------------------

/// The encoding a raw rating was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingScale {
    Stars,
    TwentyEighty,
}

/// How the caller wants bare numbers interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleHint {
    /// Classify by magnitude and flag anything the magnitude can't settle.
    #[default]
    Auto,
    Stars,
    TwentyEighty,
}

/// Result of classifying a bare number by magnitude alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleGuess {
    Stars,
    TwentyEighty,
    /// Too large for stars, too small for a scouting grade.
    Ambiguous,
}

/// Classify a bare rating by magnitude.
pub fn classify_scale(value: f64) -> ScaleGuess {
    if value <= STARS_MAX {
        ScaleGuess::Stars
    } else if value >= SCOUTING_MIN {
        ScaleGuess::TwentyEighty
    } else {
        ScaleGuess::Ambiguous
    }
}

/// Raised when the auto heuristic had to pick a scale for a value that
/// fits neither cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleFlag {
    pub raw: f64,
    pub assumed: RatingScale,
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// A rating carrying the scale it was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub value: f64,
    pub scale: RatingScale,
}

impl Rating {
    pub fn new(value: f64, scale: RatingScale) -> Self {
        Rating { value, scale }
    }

    /// A rating already on the 20-80 scale.
    pub fn scouting(value: f64) -> Self {
        Rating::new(value, RatingScale::TwentyEighty)
    }

    pub fn stars(value: f64) -> Self {
        Rating::new(value, RatingScale::Stars)
    }

    /// The lowest possible grade; stands in for a missing rating.
    pub fn floor() -> Self {
        Rating::scouting(SCOUTING_MIN)
    }

    /// Canonical 20-80 form. Applying it twice changes nothing.
    pub fn canonical(&self) -> Rating {
        let v = match self.scale {
            RatingScale::Stars => stars_to_scouting(self.value),
            RatingScale::TwentyEighty => clamp_scouting(self.value),
        };
        Rating::scouting(v)
    }

    /// Value on the 20-80 scale.
    pub fn scouting_value(&self) -> f64 {
        self.canonical().value
    }

    /// Position within the 20-80 range as 0.0-1.0.
    pub fn fraction(&self) -> f64 {
        (self.scouting_value() - SCOUTING_MIN) / (SCOUTING_MAX - SCOUTING_MIN)
    }

    /// Position within the 20-80 range as 0-100.
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating::floor()
    }
}

fn clamp_scouting(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(SCOUTING_MIN, SCOUTING_MAX)
    } else {
        SCOUTING_MIN
    }
}

/// Map a star rating onto the 20-80 scale: 1 star = 20, 3 stars = 50,
/// 5 stars = 80, 15 points per star.
pub fn stars_to_scouting(stars: f64) -> f64 {
    clamp_scouting(SCOUTING_MIN + (stars - 1.0) * 15.0)
}

/// Outcome of parsing one raw rating cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedRating {
    pub rating: Option<Rating>,
    pub flag: Option<ScaleFlag>,
}

impl ParsedRating {
    fn missing() -> Self {
        ParsedRating { rating: None, flag: None }
    }

    fn clean(rating: Rating) -> Self {
        ParsedRating { rating: Some(rating), flag: None }
    }
}

/// Parse a raw rating cell.
///
/// `"3.5 Stars"` is unambiguous regardless of hint. Bare numbers follow the
/// hint; under `ScaleHint::Auto` they are classified by magnitude and any
/// value between the two scales is resolved the legacy way (<= 10 stars,
/// otherwise 20-80) but returned with a `ScaleFlag`. Zero and placeholders
/// are treated as missing.
pub fn parse_rating(raw: &RawValue, hint: ScaleHint) -> ParsedRating {
    if raw.is_placeholder() {
        return ParsedRating::missing();
    }

    let text = raw.as_text();
    let lowered = text.trim().to_lowercase();
    if lowered.contains("star") {
        let number = lowered.replace("stars", "").replace("star", "");
        return match number.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => ParsedRating::clean(Rating::stars(v)),
            _ => ParsedRating::missing(),
        };
    }

    let value = parse_number(raw);
    if value <= 0.0 {
        return ParsedRating::missing();
    }

    match hint {
        ScaleHint::Stars => ParsedRating::clean(Rating::stars(value)),
        ScaleHint::TwentyEighty => ParsedRating::clean(Rating::scouting(value)),
        ScaleHint::Auto => match classify_scale(value) {
            ScaleGuess::Stars => ParsedRating::clean(Rating::stars(value)),
            ScaleGuess::TwentyEighty => ParsedRating::clean(Rating::scouting(value)),
            ScaleGuess::Ambiguous => {
                let assumed = if value <= STAR_HEURISTIC_CUTOFF {
                    RatingScale::Stars
                } else {
                    RatingScale::TwentyEighty
                };
                ParsedRating {
                    rating: Some(Rating::new(value, assumed)),
                    flag: Some(ScaleFlag { raw: value, assumed }),
                }
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Numbers, currency, years-left
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Strips `,` `%` `$` and whitespace; placeholders and
/// garbage yield 0.0.
pub fn parse_number(raw: &RawValue) -> f64 {
    match raw {
        RawValue::Number(n) if n.is_finite() => *n,
        RawValue::Number(_) | RawValue::Null => 0.0,
        RawValue::Text(s) => parse_number_str(s),
    }
}

pub fn parse_number_str(s: &str) -> f64 {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | '$' | ' '))
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a salary into millions of dollars.
///
/// `"$9,000,000"` -> 9.0, `"$9.5M"` -> 9.5, `"$750K"` -> 0.75. Bare numbers of
/// 1000 or more are read as dollars, smaller ones as millions. Negative,
/// placeholder and unparseable input -> 0.0.
pub fn parse_salary(raw: &RawValue) -> f64 {
    match raw {
        RawValue::Number(n) => millions_from_amount(*n),
        RawValue::Null => 0.0,
        RawValue::Text(s) => parse_salary_str(s),
    }
}

pub fn parse_salary_str(s: &str) -> f64 {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return 0.0;
    }

    let (digits, scale) = match cleaned.chars().last() {
        Some('M') | Some('m') => (&cleaned[..cleaned.len() - 1], Some(1.0)),
        Some('K') | Some('k') => (&cleaned[..cleaned.len() - 1], Some(0.001)),
        _ => (cleaned.as_str(), None),
    };

    match (digits.parse::<f64>(), scale) {
        (Ok(v), Some(factor)) if v.is_finite() && v > 0.0 => v * factor,
        (Ok(v), None) => millions_from_amount(v),
        _ => 0.0,
    }
}

fn millions_from_amount(v: f64) -> f64 {
    if !v.is_finite() || v <= 0.0 {
        0.0
    } else if v >= 1000.0 {
        v / 1_000_000.0
    } else {
        v
    }
}

/// Remaining contract years plus whatever annotation followed them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearsLeft {
    pub years: u32,
    /// Lower-cased annotation without parentheses, e.g. `"auto."`,
    /// `"arbitration"`. Empty when there was none.
    pub status: String,
}

/// Parse a years-left cell: `"1 (auto.)"`, `"3 (arbitration)"`, `"5"`, `"-"`.
pub fn parse_years_left(raw: &RawValue) -> YearsLeft {
    match raw {
        RawValue::Number(n) if n.is_finite() && *n > 0.0 => YearsLeft {
            years: n.floor() as u32,
            status: String::new(),
        },
        RawValue::Text(s) => parse_years_left_str(s),
        _ => YearsLeft::default(),
    }
}

pub fn parse_years_left_str(s: &str) -> YearsLeft {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return YearsLeft::default();
    }

    let digit_end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let years = trimmed[..digit_end].parse::<u32>().unwrap_or(0);

    let rest = trimmed[digit_end..].trim();
    let annotation = match (rest.find('('), rest.rfind(')')) {
        (Some(open), Some(close)) if close > open => &rest[open + 1..close],
        (Some(open), None) => &rest[open + 1..],
        _ => rest,
    };

    YearsLeft {
        years,
        status: annotation.trim().to_lowercase(),
    }
}

// ---------------------------------------------------------------------------
// Sample-size guards
// ---------------------------------------------------------------------------

/// Minimum playing time before current-season stats are trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleThresholds {
    pub min_batter_games: u32,
    pub min_pitcher_innings: f64,
}

impl Default for SampleThresholds {
    fn default() -> Self {
        SampleThresholds {
            min_batter_games: 40,
            min_pitcher_innings: 30.0,
        }
    }
}

impl SampleThresholds {
    pub fn batter_trusted(&self, games: u32) -> bool {
        games > self.min_batter_games
    }

    pub fn pitcher_trusted(&self, innings: f64) -> bool {
        innings > self.min_pitcher_innings
    }
}

/// Clamp `(value - lo) / (hi - lo)` into 0.0-1.0. Works for inverted bands
/// (`lo > hi`) where smaller is better.
pub fn band(value: f64, lo: f64, hi: f64) -> f64 {
    if (hi - lo).abs() < f64::EPSILON || !value.is_finite() {
        return 0.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn three_stars_is_average() {
        assert!(approx_eq(stars_to_scouting(3.0), 50.0, 1e-9));
        assert!(approx_eq(stars_to_scouting(3.5), 57.5, 1e-9));
        assert!(approx_eq(stars_to_scouting(1.0), 20.0, 1e-9));
        assert!(approx_eq(stars_to_scouting(5.0), 80.0, 1e-9));
        assert!(approx_eq(stars_to_scouting(0.5), 20.0, 1e-9));
    }

    #[test]
    fn parse_rating_star_strings() {
        let parsed = parse_rating(&"3.5 Stars".into(), ScaleHint::TwentyEighty);
        assert_eq!(parsed.rating, Some(Rating::stars(3.5)));
        assert!(parsed.flag.is_none());
        let parsed = parse_rating(&"1 Star".into(), ScaleHint::Auto);
        assert_eq!(parsed.rating.unwrap().scouting_value(), 20.0);
    }

    #[test]
    fn parse_rating_auto_classifies_by_magnitude() {
        let low = parse_rating(&RawValue::Number(4.0), ScaleHint::Auto);
        assert_eq!(low.rating, Some(Rating::stars(4.0)));
        assert!(low.flag.is_none());

        let high = parse_rating(&RawValue::Number(55.0), ScaleHint::Auto);
        assert_eq!(high.rating, Some(Rating::scouting(55.0)));
        assert!(high.flag.is_none());
    }

    #[test]
    fn parse_rating_flags_values_between_scales() {
        let seven = parse_rating(&RawValue::Number(7.0), ScaleHint::Auto);
        assert_eq!(seven.rating.unwrap().scale, RatingScale::Stars);
        assert_eq!(
            seven.flag,
            Some(ScaleFlag { raw: 7.0, assumed: RatingScale::Stars })
        );

        let fifteen = parse_rating(&"15".into(), ScaleHint::Auto);
        assert_eq!(fifteen.rating.unwrap().scale, RatingScale::TwentyEighty);
        assert!(fifteen.flag.is_some());
    }

    #[test]
    fn parse_rating_explicit_hint_is_never_flagged() {
        let p = parse_rating(&RawValue::Number(7.0), ScaleHint::TwentyEighty);
        assert_eq!(p.rating, Some(Rating::scouting(7.0)));
        assert!(p.flag.is_none());
        assert_eq!(p.rating.unwrap().scouting_value(), SCOUTING_MIN);
    }

    #[test]
    fn parse_rating_missing_values() {
        assert_eq!(parse_rating(&"-".into(), ScaleHint::Auto).rating, None);
        assert_eq!(parse_rating(&RawValue::Number(0.0), ScaleHint::Auto).rating, None);
        assert_eq!(parse_rating(&"garbage".into(), ScaleHint::Auto).rating, None);
        assert_eq!(parse_rating(&"x Stars".into(), ScaleHint::Auto).rating, None);
    }

    #[test]
    fn canonical_does_not_depend_on_source_encoding() {
        let from_stars = Rating::stars(3.0).canonical();
        let from_grade = Rating::scouting(50.0).canonical();
        assert_eq!(from_stars, from_grade);
    }

    #[test]
    fn percent_spans_zero_to_hundred() {
        assert!(approx_eq(Rating::scouting(20.0).percent(), 0.0, 1e-9));
        assert!(approx_eq(Rating::scouting(50.0).percent(), 50.0, 1e-9));
        assert!(approx_eq(Rating::scouting(80.0).percent(), 100.0, 1e-9));
        assert!(approx_eq(Rating::scouting(95.0).percent(), 100.0, 1e-9));
    }

    #[test]
    fn parse_salary_examples() {
        assert!(approx_eq(parse_salary(&"$9,000,000".into()), 9.0, 1e-9));
        assert_eq!(parse_salary(&"-".into()), 0.0);
        assert_eq!(parse_salary(&"".into()), 0.0);
        assert_eq!(parse_salary(&"n/a".into()), 0.0);
        assert!(approx_eq(parse_salary(&"$800,000".into()), 0.8, 1e-9));
        assert!(approx_eq(parse_salary(&"$9.5M".into()), 9.5, 1e-9));
        assert!(approx_eq(parse_salary(&"$750K".into()), 0.75, 1e-9));
        assert!(approx_eq(parse_salary(&RawValue::Number(20_000_000.0)), 20.0, 1e-9));
        assert!(approx_eq(parse_salary(&RawValue::Number(12.5)), 12.5, 1e-9));
        assert_eq!(parse_salary(&RawValue::Number(-5.0)), 0.0);
    }

    #[test]
    fn parse_years_left_examples() {
        assert_eq!(
            parse_years_left(&"1 (auto.)".into()),
            YearsLeft { years: 1, status: "auto.".into() }
        );
        assert_eq!(
            parse_years_left(&"3 (Arbitration)".into()),
            YearsLeft { years: 3, status: "arbitration".into() }
        );
        assert_eq!(
            parse_years_left(&"5".into()),
            YearsLeft { years: 5, status: String::new() }
        );
        assert_eq!(parse_years_left(&RawValue::Number(4.0)).years, 4);
        assert_eq!(parse_years_left(&"-".into()), YearsLeft::default());
        assert_eq!(parse_years_left(&"(pre-arb)".into()).status, "pre-arb");
    }

    #[test]
    fn parse_number_strips_decorations() {
        assert!(approx_eq(parse_number(&"1,234".into()), 1234.0, 1e-9));
        assert!(approx_eq(parse_number(&"12.5%".into()), 12.5, 1e-9));
        assert!(approx_eq(parse_number(&".312".into()), 0.312, 1e-9));
        assert_eq!(parse_number(&"-".into()), 0.0);
        assert_eq!(parse_number(&RawValue::Number(f64::NAN)), 0.0);
    }

    #[test]
    fn sample_thresholds_require_exceeding_minimum() {
        let t = SampleThresholds::default();
        assert!(!t.batter_trusted(40));
        assert!(t.batter_trusted(41));
        assert!(!t.pitcher_trusted(30.0));
        assert!(t.pitcher_trusted(30.1));
    }

    #[test]
    fn band_handles_inverted_ranges() {
        assert!(approx_eq(band(4.0, 5.5, 2.5), 0.5, 1e-9));
        assert_eq!(band(6.0, 5.5, 2.5), 0.0);
        assert_eq!(band(1.0, 5.5, 2.5), 1.0);
        assert_eq!(band(1.0, 1.0, 1.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_canonical_is_idempotent(v in -10.0f64..120.0, stars in any::<bool>()) {
            let r = if stars { Rating::stars(v) } else { Rating::scouting(v) };
            let once = r.canonical();
            prop_assert_eq!(once.canonical(), once);
        }

        #[test]
        fn prop_star_mapping_preserves_order(a in 0.0f64..6.0, b in 0.0f64..6.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Rating::stars(lo).scouting_value() <= Rating::stars(hi).scouting_value());
        }

        #[test]
        fn prop_scouting_mapping_preserves_order(a in 0.0f64..100.0, b in 0.0f64..100.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Rating::scouting(lo).scouting_value() <= Rating::scouting(hi).scouting_value());
        }

        #[test]
        fn prop_parse_salary_never_negative(s in ".{0,16}") {
            let v = parse_salary_str(&s);
            prop_assert!(v >= 0.0 && v.is_finite());
        }
    }
}
