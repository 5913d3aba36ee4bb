//! Date formatting and relative date parsing for the `date` and `strtotime`
//! modifiers. All computations are in UTC.

use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc,
};

/// Format used by `date` when no format argument is given.
pub const DEFAULT_DATE_FORMAT: &str = "Y/m/d H:i:s";

/// Formats a Unix timestamp with a PHP `date()`-style format string.
///
/// Each format character is replaced by a date component (`Y` year, `m`
/// month, `d` day, `H` hour, `i` minute, `s` second, and so on); a
/// backslash emits the next character literally. Unknown characters are
/// copied through. Timestamps outside chrono's range render as an empty
/// string.
///
/// # Example
///
/// ```
/// use strbuild::format_date;
///
/// assert_eq!(format_date(0, "Y-m-d\\TH:i:s"), "1970-01-01T00:00:00");
/// assert_eq!(format_date(86_400 * 31, "D, jS F"), "Sun, 1st February");
/// ```
pub fn format_date(timestamp: i64, format: &str) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => PhpDate { dt, format }.to_string(),
        None => String::new(),
    }
}

/// A timestamp paired with a PHP-style format, rendered through [`Display`].
struct PhpDate<'a> {
    dt: DateTime<Utc>,
    format: &'a str,
}

impl Display for PhpDate<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let dt = &self.dt;
        let mut chars = self.format.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(literal) = chars.next() {
                        f.write_char(literal)?;
                    }
                }
                'd' => write!(f, "{:02}", dt.day())?,
                'D' => write!(f, "{}", dt.format("%a"))?,
                'j' => write!(f, "{}", dt.day())?,
                'l' => write!(f, "{}", dt.format("%A"))?,
                'N' => write!(f, "{}", dt.weekday().number_from_monday())?,
                'S' => write!(f, "{}", ordinal_suffix(dt.day()))?,
                'w' => write!(f, "{}", dt.weekday().num_days_from_sunday())?,
                'z' => write!(f, "{}", dt.ordinal0())?,
                'W' => write!(f, "{:02}", dt.iso_week().week())?,
                'F' => write!(f, "{}", dt.format("%B"))?,
                'm' => write!(f, "{:02}", dt.month())?,
                'M' => write!(f, "{}", dt.format("%b"))?,
                'n' => write!(f, "{}", dt.month())?,
                't' => write!(f, "{}", days_in_month(dt.year(), dt.month()))?,
                'L' => write!(f, "{}", u8::from(is_leap_year(dt.year())))?,
                'o' => write!(f, "{}", dt.iso_week().year())?,
                'Y' => write!(f, "{}", dt.year())?,
                'y' => write!(f, "{:02}", dt.year().rem_euclid(100))?,
                'a' => f.write_str(if dt.hour() < 12 { "am" } else { "pm" })?,
                'A' => f.write_str(if dt.hour() < 12 { "AM" } else { "PM" })?,
                'g' => write!(f, "{}", dt.hour12().1)?,
                'G' => write!(f, "{}", dt.hour())?,
                'h' => write!(f, "{:02}", dt.hour12().1)?,
                'H' => write!(f, "{:02}", dt.hour())?,
                'i' => write!(f, "{:02}", dt.minute())?,
                's' => write!(f, "{:02}", dt.second())?,
                'u' => f.write_str("000000")?,
                'v' => f.write_str("000")?,
                'e' | 'T' => f.write_str("UTC")?,
                'I' | 'Z' => f.write_str("0")?,
                'O' => f.write_str("+0000")?,
                'P' => f.write_str("+00:00")?,
                'p' => f.write_str("Z")?,
                'c' => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S+00:00"))?,
                'r' => write!(f, "{}", dt.format("%a, %d %b %Y %H:%M:%S +0000"))?,
                'U' => write!(f, "{}", dt.timestamp())?,
                other => f.write_char(other)?,
            }
        }
        Ok(())
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Parses an absolute or relative date description into a Unix timestamp.
///
/// Understands `@<unix>`, `YYYY-MM-DD` and `YYYY/MM/DD` dates with an
/// optional `HH:MM[:SS]` time, RFC 3339 timestamps, the keywords `now`,
/// `today`, `midnight`, `noon`, `tomorrow` and `yesterday`, and chains of
/// offsets such as `+1 day`, `-2 weeks`, `next month` or `3 hours ago`.
/// Relative forms are computed from `base`. Returns `None` for anything
/// else.
///
/// # Example
///
/// ```
/// use strbuild::strtotime;
///
/// assert_eq!(strtotime("1970-01-02", 0), Some(86_400));
/// assert_eq!(strtotime("+1 day 2 hours", 0), Some(93_600));
/// assert_eq!(strtotime("whenever", 0), None);
/// ```
pub fn strtotime(text: &str, base: i64) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(unix) = text.strip_prefix('@') {
        return unix.trim().parse().ok();
    }
    if let Some(absolute) = parse_absolute(text) {
        return Some(absolute.and_utc().timestamp());
    }
    let base = DateTime::from_timestamp(base, 0)?.naive_utc();
    parse_relative(&text.to_ascii_lowercase(), base).map(|dt| dt.and_utc().timestamp())
}

fn parse_absolute(text: &str) -> Option<NaiveDateTime> {
    const DATE_TIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

#[derive(Debug, Clone, PartialEq)]
enum RelativeToken {
    Number(i64),
    Word(String),
}

fn relative_tokens(text: &str) -> Option<Vec<RelativeToken>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '+' || c == '-' {
            let mut sign = 1;
            if c == '+' || c == '-' {
                if c == '-' {
                    sign = -1;
                }
                chars.next();
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
            }
            let mut digits = String::new();
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                digits.push(digit);
            }
            let number: i64 = digits.parse().ok()?;
            tokens.push(RelativeToken::Number(sign * number));
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(letter) = chars.next_if(|c| c.is_alphabetic()) {
                word.push(letter);
            }
            tokens.push(RelativeToken::Word(word));
        } else {
            chars.next();
        }
    }
    Some(tokens)
}

fn parse_relative(text: &str, base: NaiveDateTime) -> Option<NaiveDateTime> {
    let tokens = relative_tokens(text)?;
    let mut current = base;
    let mut index = 0;
    while index < tokens.len() {
        let (amount, unit) = match &tokens[index] {
            RelativeToken::Word(word) => match word.as_str() {
                "now" => {
                    index += 1;
                    continue;
                }
                "today" | "midnight" => {
                    current = current.date().and_time(NaiveTime::MIN);
                    index += 1;
                    continue;
                }
                "noon" => {
                    current = current.date().and_time(NaiveTime::from_hms_opt(12, 0, 0)?);
                    index += 1;
                    continue;
                }
                "tomorrow" => {
                    current = current.date().succ_opt()?.and_time(NaiveTime::MIN);
                    index += 1;
                    continue;
                }
                "yesterday" => {
                    current = current.date().pred_opt()?.and_time(NaiveTime::MIN);
                    index += 1;
                    continue;
                }
                "next" => (1, tokens.get(index + 1)?),
                "last" => (-1, tokens.get(index + 1)?),
                _ => return None,
            },
            RelativeToken::Number(n) => (*n, tokens.get(index + 1)?),
        };
        let RelativeToken::Word(unit) = unit else {
            return None;
        };
        index += 2;
        let amount = if tokens.get(index) == Some(&RelativeToken::Word("ago".to_string())) {
            index += 1;
            -amount
        } else {
            amount
        };
        current = shift(current, amount, unit)?;
    }
    Some(current)
}

fn shift(dt: NaiveDateTime, amount: i64, unit: &str) -> Option<NaiveDateTime> {
    let unit = unit.strip_suffix('s').unwrap_or(unit);
    let seconds_per_unit = match unit {
        "sec" | "second" => 1,
        "min" | "minute" => 60,
        "hour" => 3_600,
        "day" => 86_400,
        "week" => 604_800,
        "fortnight" => 1_209_600,
        "month" => return shift_months(dt, amount),
        "year" => return shift_months(dt, amount.checked_mul(12)?),
        _ => return None,
    };
    let delta = TimeDelta::try_seconds(amount.checked_mul(seconds_per_unit)?)?;
    dt.checked_add_signed(delta)
}

fn shift_months(dt: NaiveDateTime, amount: i64) -> Option<NaiveDateTime> {
    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
    if amount >= 0 {
        dt.checked_add_months(months)
    } else {
        dt.checked_sub_months(months)
    }
}

/// Current time as a Unix timestamp.
pub(crate) fn now() -> i64 {
    Utc::now().timestamp()
}
