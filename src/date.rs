//! HTTP-date codec over all three RFC 7231 date formats, implemented by
//! hand rather than pulled in from a date/time crate — exact-length
//! validation and windowed two-digit years are the entire point of this
//! module, not ambient plumbing around it.

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const FULL_DAY_NAMES: [&str; 7] =
    ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
const MONTH_NAMES: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// A calendar instant at second resolution, UTC only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl HttpDate {
    /// Construct from components, validating that the calendar date and
    /// clock values are real.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if day < 1 || day > days_in_month(year, month) {
            return None;
        }
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self { year, month, day, hour, minute, second })
    }

    /// Day of week, Sunday = 0, via Zeller-congruence-derived Sakamoto's
    /// algorithm.
    fn day_of_week(&self) -> usize {
        const T: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let mut y = self.year as i32;
        if self.month < 3 {
            y -= 1;
        }
        let d = (y + y / 4 - y / 100 + y / 400 + T[(self.month - 1) as usize] + self.day as i32)
            % 7;
        d as usize
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Format as IMF-fixdate: `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn format_http_date(date: &HttpDate) -> String {
    format!(
        "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
        DAY_NAMES[date.day_of_week()],
        date.day,
        MONTH_NAMES[(date.month - 1) as usize],
        date.year,
        date.hour,
        date.minute,
        date.second,
    )
}

/// Parse any of the three RFC 7231 date formats; returns `None` on any
/// malformation, including trailing content and out-of-range calendar
/// values.
pub fn parse_http_date(s: &str) -> Option<HttpDate> {
    parse_imf_fixdate(s).or_else(|| parse_rfc850(s)).or_else(|| parse_asctime(s))
}

pub fn is_valid_http_date(s: &str) -> bool {
    parse_http_date(s).is_some()
}

fn month_index(name: &str) -> Option<u8> {
    MONTH_NAMES.iter().position(|m| *m == name).map(|i| (i + 1) as u8)
}

fn full_day_index(name: &str) -> Option<usize> {
    FULL_DAY_NAMES.iter().position(|d| *d == name)
}

/// `Sun, 06 Nov 1994 08:49:37 GMT` — fixed length 29.
fn parse_imf_fixdate(s: &str) -> Option<HttpDate> {
    if s.len() != 29 {
        return None;
    }
    let b = s.as_bytes();
    if b[3] != b',' || b[4] != b' ' || b[7] != b' ' || b[11] != b' ' || b[16] != b' ' {
        return None;
    }
    if b[19] != b':' || b[22] != b':' || &s[25..29] != "GMT" {
        return None;
    }

    let weekday = &s[0..3];
    let day: u8 = s[5..7].parse().ok()?;
    let month = month_index(&s[8..11])?;
    let year: u16 = s[12..16].parse().ok()?;
    let hour: u8 = s[17..19].parse().ok()?;
    let minute: u8 = s[20..22].parse().ok()?;
    let second: u8 = s[23..25].parse().ok()?;

    if !s[5..7].bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let date = HttpDate::new(year, month, day, hour, minute, second)?;
    if DAY_NAMES.get(date.day_of_week()).copied() != Some(weekday) {
        return None;
    }
    Some(date)
}

/// `Sunday, 06-Nov-94 08:49:37 GMT` — variable weekday-name length.
fn parse_rfc850(s: &str) -> Option<HttpDate> {
    let (weekday, rest) = s.split_once(", ")?;
    if !weekday.chars().all(|c| c.is_ascii_alphabetic()) || weekday.len() < 6 {
        return None;
    }
    // Remaining fixed part: "06-Nov-94 08:49:37 GMT" — 22 bytes.
    if rest.len() != 22 {
        return None;
    }
    let b = rest.as_bytes();
    if b[2] != b'-' || b[6] != b'-' || b[9] != b' ' || b[12] != b':' || b[15] != b':' {
        return None;
    }
    if &rest[18..22] != "GMT" {
        return None;
    }

    let day: u8 = rest[0..2].parse().ok()?;
    let month = month_index(&rest[3..6])?;
    let two_digit_year: u16 = rest[7..9].parse().ok()?;
    let hour: u8 = rest[10..12].parse().ok()?;
    let minute: u8 = rest[13..15].parse().ok()?;
    let second: u8 = rest[16..18].parse().ok()?;

    // 70-99 -> 1970-1999, 00-69 -> 2000-2069.
    let year = if two_digit_year >= 70 { 1900 + two_digit_year } else { 2000 + two_digit_year };

    let date = HttpDate::new(year, month, day, hour, minute, second)?;
    if full_day_index(weekday) != Some(date.day_of_week()) {
        return None;
    }
    Some(date)
}

/// `Sun Nov  6 08:49:37 1994` — day may be single-space-padded; fixed
/// length 24.
fn parse_asctime(s: &str) -> Option<HttpDate> {
    if s.len() != 24 {
        return None;
    }
    let b = s.as_bytes();
    if b[3] != b' ' || b[7] != b' ' || b[10] != b' ' || b[13] != b':' || b[16] != b':' || b[19] != b' ' {
        return None;
    }

    let weekday = &s[0..3];
    let month = month_index(&s[4..7])?;
    let day_field = &s[8..10];
    let day: u8 = if day_field.as_bytes()[0] == b' ' {
        day_field[1..].parse().ok()?
    } else {
        day_field.parse().ok()?
    };
    let hour: u8 = s[11..13].parse().ok()?;
    let minute: u8 = s[14..16].parse().ok()?;
    let second: u8 = s[17..19].parse().ok()?;
    let year: u16 = s[20..24].parse().ok()?;

    let date = HttpDate::new(year, month, day, hour, minute, second)?;
    if DAY_NAMES.get(date.day_of_week()).copied() != Some(weekday) {
        return None;
    }
    Some(date)
}
