// Utility helpers for parsing and basic statistics.
//
// The CSV fields are loosely formatted (stray spaces around numbers), so the
// parsers trim before converting. The statistics follow the usual descriptive
// conventions: an empty sample has no mean, and a sample of one has no
// standard deviation.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a trimmed numeric field. Returns `None` for empty or malformed text.
pub fn parse_trimmed<T: FromStr>(s: &str) -> Option<T> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<T>().ok()
}

/// Dates in the delivery dataset are written `DD-MM-YYYY`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Sunday-start week number, zero padded (`00` is the partial first week).
pub fn week_of_year(date: NaiveDate) -> String {
    date.format("%U").to_string()
}

pub fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Sample standard deviation (n - 1 in the denominator).
pub fn std_dev(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return f64::NAN;
    }
    let m = mean(v);
    let ss: f64 = v.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (v.len() - 1) as f64).sqrt()
}

/// Round to two decimals, halves to even.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round_ties_even() / 100.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // NaN marks an empty group; print it as-is rather than as zero.
    if !n.is_finite() {
        return format!("{}", n);
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trimmed_tolerates_spaces() {
        assert_eq!(parse_trimmed::<u32>(" 37 "), Some(37));
        assert_eq!(parse_trimmed::<f64>("4.9"), Some(4.9));
        assert_eq!(parse_trimmed::<u32>("NaN "), None);
        assert_eq!(parse_trimmed::<u32>("  "), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("19-03-2022"), NaiveDate::from_ymd_opt(2022, 3, 19));
        assert_eq!(parse_date("2022-03-19"), None);
        assert_eq!(parse_date("31-02-2022"), None);
    }

    #[test]
    fn test_week_of_year_sunday_start() {
        // 2022-01-01 is a Saturday, 2022-01-02 the first Sunday.
        let sat = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let sun = NaiveDate::from_ymd_opt(2022, 1, 2).unwrap();
        let later = NaiveDate::from_ymd_opt(2022, 3, 19).unwrap();
        assert_eq!(week_of_year(sat), "00");
        assert_eq!(week_of_year(sun), "01");
        assert_eq!(week_of_year(later), "11");
    }

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[10.0, 20.0]), 15.0);
        assert!((std_dev(&[10.0, 20.0]) - 7.0710678).abs() < 1e-6);
        assert!(mean(&[]).is_nan());
        assert!(std_dev(&[42.0]).is_nan());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(26.456), 26.46);
        assert_eq!(round2(7.0710678), 7.07);
        assert_eq!(round2(26.125), 26.12);
        assert_eq!(round2(26.375), 26.38);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-3.5, 1), "-3.5");
        assert_eq!(format_number(12.0, 0), "12");
        assert_eq!(format_number(f64::NAN, 2), "NaN");
    }
}
