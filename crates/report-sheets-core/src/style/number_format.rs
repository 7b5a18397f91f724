//! Number formats and formatted display of numeric cells
//!
//! The formatter covers the pattern families report templates use: integer and
//! decimal placeholders, thousands separators, percent, scientific notation,
//! the text placeholder and date-time patterns. Fractions fall back to the
//! general representation.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Number format of a style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (built-in id 0)
    #[default]
    General,

    /// Built-in format by id
    BuiltIn(u32),

    /// Custom format pattern
    Custom(String),
}

impl NumberFormat {
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 22 - m/d/yy h:mm
    pub const ID_DATETIME: u32 = 22;
    /// 49 - @
    pub const ID_TEXT: u32 = 49;

    /// Pattern text for a built-in id
    pub fn builtin(id: u32) -> Option<&'static str> {
        let pattern = match id {
            0 => "General",
            1 => "0",
            2 => "0.00",
            3 => "#,##0",
            4 => "#,##0.00",
            9 => "0%",
            10 => "0.00%",
            11 => "0.00E+00",
            12 => "# ?/?",
            13 => "# ??/??",
            14 => "m/d/yy",
            15 => "d-mmm-yy",
            16 => "d-mmm",
            17 => "mmm-yy",
            18 => "h:mm AM/PM",
            19 => "h:mm:ss AM/PM",
            20 => "h:mm",
            21 => "h:mm:ss",
            22 => "m/d/yy h:mm",
            37 => "#,##0 ;(#,##0)",
            38 => "#,##0 ;[Red](#,##0)",
            39 => "#,##0.00;(#,##0.00)",
            40 => "#,##0.00;[Red](#,##0.00)",
            45 => "mm:ss",
            46 => "[h]:mm:ss",
            47 => "mmss.0",
            48 => "##0.0E+0",
            49 => "@",
            _ => return None,
        };
        Some(pattern)
    }

    /// Format from a pattern, reusing the built-in id when one matches
    pub fn from_pattern(pattern: &str) -> Self {
        if pattern.is_empty() || pattern.eq_ignore_ascii_case("General") {
            return NumberFormat::General;
        }
        (1..=49)
            .find(|id| Self::builtin(*id) == Some(pattern))
            .map(NumberFormat::BuiltIn)
            .unwrap_or_else(|| NumberFormat::Custom(pattern.to_string()))
    }

    /// Built-in id, `None` for custom patterns
    pub fn id(&self) -> Option<u32> {
        match self {
            NumberFormat::General => Some(0),
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(_) => None,
        }
    }

    /// Pattern text; unknown built-in ids read as `General`
    pub fn pattern(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => Self::builtin(*id).unwrap_or("General"),
            NumberFormat::Custom(s) => s,
        }
    }

    /// Check whether numbers in this format are dates or times
    pub fn is_date_format(&self) -> bool {
        match self {
            NumberFormat::General => false,
            NumberFormat::BuiltIn(id) => matches!(id, 14..=22 | 45..=47),
            NumberFormat::Custom(s) => is_date_pattern(s),
        }
    }

    /// Render a number the way the format displays it
    pub fn format_number(&self, value: f64) -> String {
        format_with_pattern(self.pattern(), value)
    }
}

/// Excel serial number of a date-time (1900 date system)
pub fn datetime_to_serial(datetime: NaiveDateTime) -> f64 {
    let epoch = excel_epoch();
    let millis = datetime.signed_duration_since(epoch).num_milliseconds() as f64;
    let serial = millis / 86_400_000.0;
    // serials below 60 sit before the phantom 1900-02-29
    if serial < 61.0 {
        serial - 1.0
    } else {
        serial
    }
}

/// Date-time of an Excel serial number (1900 date system)
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let serial = if serial < 60.0 { serial + 1.0 } else { serial };
    let millis = (serial * 86_400_000.0).round() as i64;
    excel_epoch().checked_add_signed(Duration::milliseconds(millis))
}

fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Pattern text with quoted literals, escapes and bracket tags removed
fn strip_literals(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let mut tag = String::new();
                for q in chars.by_ref() {
                    if q == ']' {
                        break;
                    }
                    tag.push(q);
                }
                // elapsed-time tags keep their unit
                if matches!(tag.to_ascii_lowercase().as_str(), "h" | "hh" | "m" | "mm" | "s" | "ss")
                {
                    out.push_str(&tag);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn is_date_pattern(pattern: &str) -> bool {
    let first = pattern.split(';').next().unwrap_or_default();
    let stripped = strip_literals(first).to_ascii_lowercase();
    if stripped == "general" || stripped.contains('@') {
        return false;
    }
    stripped
        .chars()
        .any(|c| matches!(c, 'y' | 'm' | 'd' | 'h' | 's'))
}

fn format_with_pattern(pattern: &str, value: f64) -> String {
    if pattern.eq_ignore_ascii_case("General") || pattern.is_empty() {
        return general(value);
    }

    let sections: Vec<&str> = split_sections(pattern);
    let (section, value) = match sections.as_slice() {
        [only] => (*only, value),
        [_, neg, ..] if value < 0.0 => (*neg, -value),
        [_, _, zero, ..] if value == 0.0 => (*zero, value),
        [pos, ..] => (*pos, value),
        [] => return general(value),
    };

    if is_date_pattern(section) {
        return match serial_to_datetime(value) {
            Some(datetime) => format_datetime(section, datetime, value),
            None => general(value),
        };
    }

    let stripped = strip_literals(section);
    if stripped.trim() == "@" {
        return general(value);
    }
    if stripped.contains('?') && stripped.contains('/') {
        return general(value);
    }
    format_numeric(section, value)
}

/// Split on `;` outside quoted literals
fn split_sections(pattern: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in pattern.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            ';' if !in_quote => {
                sections.push(&pattern[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    sections.push(&pattern[start..]);
    sections
}

/// Shortest plain representation, integers without a decimal point
fn general(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.10}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Pieces of a numeric section: literal prefix, number placeholder, literal suffix
struct NumericParts {
    prefix: String,
    number: String,
    suffix: String,
}

fn split_numeric(section: &str) -> NumericParts {
    let mut parts = NumericParts {
        prefix: String::new(),
        number: String::new(),
        suffix: String::new(),
    };
    let mut chars = section.chars().peekable();
    while let Some(c) = chars.next() {
        let literal = match c {
            '"' => {
                let mut text = String::new();
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                    text.push(q);
                }
                Some(text)
            }
            '\\' => chars.next().map(String::from),
            '_' => {
                chars.next();
                Some(" ".to_string())
            }
            '*' => {
                chars.next();
                None
            }
            '[' => {
                for q in chars.by_ref() {
                    if q == ']' {
                        break;
                    }
                }
                None
            }
            '0' | '#' | '?' | '.' | ',' => {
                parts.number.push(c);
                None
            }
            'E' | 'e' if !parts.number.is_empty() && parts.suffix.is_empty() => {
                parts.number.push('E');
                if let Some(sign) = chars.next_if(|s| *s == '+' || *s == '-') {
                    parts.number.push(sign);
                }
                None
            }
            other => Some(other.to_string()),
        };
        if let Some(text) = literal {
            if parts.number.is_empty() {
                parts.prefix.push_str(&text);
            } else {
                parts.suffix.push_str(&text);
            }
        }
    }
    parts
}

fn format_numeric(section: &str, value: f64) -> String {
    let parts = split_numeric(section);
    if parts.number.is_empty() {
        return format!("{}{}", parts.prefix, parts.suffix);
    }

    let percent = parts.prefix.contains('%') || parts.suffix.contains('%');
    let value = if percent { value * 100.0 } else { value };

    let body = match parts.number.split_once('E') {
        Some((mantissa, exponent)) => format_scientific(mantissa, exponent, value),
        None => format_plain(&parts.number, value),
    };
    format!("{}{}{}", parts.prefix, body, parts.suffix)
}

fn format_plain(number: &str, value: f64) -> String {
    // trailing commas scale by thousands
    let mut number = number;
    let mut value = value;
    while let Some(rest) = number.strip_suffix(',') {
        number = rest;
        value /= 1000.0;
    }

    let (int_pattern, frac_pattern) = number.split_once('.').unwrap_or((number, ""));
    let grouping = int_pattern.contains(',');
    let min_int = int_pattern.chars().filter(|c| *c == '0').count();
    let decimals = frac_pattern.chars().filter(|c| matches!(c, '0' | '#' | '?')).count();
    let required = frac_pattern.chars().filter(|c| *c == '0').count();

    let negative = value < 0.0;
    let text = format!("{:.*}", decimals, value.abs());
    let (int_digits, frac_digits) = text.split_once('.').unwrap_or((&text, ""));

    let mut int_digits = int_digits.trim_start_matches('0').to_string();
    while int_digits.len() < min_int {
        int_digits.insert(0, '0');
    }
    if grouping {
        int_digits = group_thousands(&int_digits);
    }

    let mut frac_digits = frac_digits.to_string();
    while frac_digits.len() > required && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    let mut out = String::new();
    if negative && (int_digits.chars().any(|c| c != '0' && c != ',') || frac_digits.chars().any(|c| c != '0')) {
        out.push('-');
    }
    out.push_str(&int_digits);
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(&frac_digits);
    } else if number.ends_with('.') {
        out.push('.');
    }
    out
}

fn format_scientific(mantissa: &str, exponent: &str, value: f64) -> String {
    let (_, frac_pattern) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let decimals = frac_pattern.len();
    let exp_digits = exponent.chars().filter(|c| *c == '0').count().max(1);
    let show_plus = exponent.starts_with('+');

    let text = format!("{:.*e}", decimals, value);
    let (digits, exp) = text.split_once('e').unwrap_or((&text, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    let sign = if exp < 0 {
        "-"
    } else if show_plus {
        "+"
    } else {
        ""
    };
    format!("{digits}E{sign}{:0width$}", exp.abs(), width = exp_digits)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, PartialEq)]
enum DateToken {
    Year(usize),
    Month(usize),
    Minute(usize),
    Day(usize),
    Hour(usize),
    Second(usize),
    SubSecond(usize),
    AmPm { short: bool },
    Literal(String),
}

fn tokenize_date(section: &str) -> Vec<DateToken> {
    let chars: Vec<char> = section.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let lower = c.to_ascii_lowercase();
        let rest: String = chars[i..].iter().collect();

        if rest.get(..5).map_or(false, |s| s.eq_ignore_ascii_case("AM/PM")) {
            tokens.push(DateToken::AmPm { short: false });
            i += 5;
            continue;
        }
        if rest.get(..3).map_or(false, |s| s.eq_ignore_ascii_case("A/P")) {
            tokens.push(DateToken::AmPm { short: true });
            i += 3;
            continue;
        }

        match lower {
            'y' | 'm' | 'd' | 'h' | 's' => {
                let run = chars[i..]
                    .iter()
                    .take_while(|x| x.to_ascii_lowercase() == lower)
                    .count();
                tokens.push(match lower {
                    'y' => DateToken::Year(run),
                    'm' => DateToken::Month(run),
                    'd' => DateToken::Day(run),
                    'h' => DateToken::Hour(run),
                    _ => DateToken::Second(run),
                });
                i += run;
            }
            '.' if chars.get(i + 1) == Some(&'0') => {
                let run = chars[i + 1..].iter().take_while(|x| **x == '0').count();
                tokens.push(DateToken::SubSecond(run));
                i += run + 1;
            }
            '"' => {
                let text: String = chars[i + 1..].iter().take_while(|x| **x != '"').collect();
                i += text.chars().count() + 2;
                tokens.push(DateToken::Literal(text));
            }
            '\\' => {
                if let Some(next) = chars.get(i + 1) {
                    tokens.push(DateToken::Literal(next.to_string()));
                }
                i += 2;
            }
            '[' => {
                let tag: String = chars[i + 1..].iter().take_while(|x| **x != ']').collect();
                i += tag.chars().count() + 2;
                let tag = tag.to_ascii_lowercase();
                if let Some(unit) = tag.chars().next().filter(|u| matches!(u, 'h' | 'm' | 's')) {
                    let run = tag.len();
                    tokens.push(match unit {
                        'h' => DateToken::Hour(run),
                        'm' => DateToken::Minute(run),
                        _ => DateToken::Second(run),
                    });
                }
            }
            '_' | '*' => i += 2,
            _ => {
                tokens.push(DateToken::Literal(c.to_string()));
                i += 1;
            }
        }
    }

    // `m` after an hour or before a second is minutes
    for idx in 0..tokens.len() {
        if let DateToken::Month(run) = tokens[idx] {
            if run > 2 {
                continue;
            }
            let after_hour = tokens[..idx]
                .iter()
                .rev()
                .find(|t| !matches!(t, DateToken::Literal(_)))
                .map_or(false, |t| matches!(t, DateToken::Hour(_)));
            let before_second = tokens[idx + 1..]
                .iter()
                .find(|t| !matches!(t, DateToken::Literal(_)))
                .map_or(false, |t| matches!(t, DateToken::Second(_)));
            if after_hour || before_second {
                tokens[idx] = DateToken::Minute(run);
            }
        }
    }
    tokens
}

fn format_datetime(section: &str, datetime: NaiveDateTime, serial: f64) -> String {
    const MONTHS: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    const DAYS: [&str; 7] = [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ];

    let tokens = tokenize_date(section);
    let twelve_hour = tokens.iter().any(|t| matches!(t, DateToken::AmPm { .. }));
    let pad = |n: u32, run: usize| {
        if run >= 2 {
            format!("{n:02}")
        } else {
            n.to_string()
        }
    };

    let mut out = String::new();
    for token in &tokens {
        match token {
            DateToken::Year(run) if *run <= 2 => out.push_str(&format!("{:02}", datetime.year() % 100)),
            DateToken::Year(_) => out.push_str(&format!("{:04}", datetime.year())),
            DateToken::Month(run) => {
                let name = MONTHS[datetime.month0() as usize];
                match run {
                    1 | 2 => out.push_str(&pad(datetime.month(), *run)),
                    3 => out.push_str(&name[..3]),
                    5 => out.push_str(&name[..1]),
                    _ => out.push_str(name),
                }
            }
            DateToken::Day(run) => {
                let name = DAYS[datetime.weekday().num_days_from_monday() as usize];
                match run {
                    1 | 2 => out.push_str(&pad(datetime.day(), *run)),
                    3 => out.push_str(&name[..3]),
                    _ => out.push_str(name),
                }
            }
            DateToken::Hour(run) => {
                let hour = if twelve_hour {
                    match datetime.hour() % 12 {
                        0 => 12,
                        h => h,
                    }
                } else if section.contains('[') {
                    (serial * 24.0).floor() as u32
                } else {
                    datetime.hour()
                };
                out.push_str(&pad(hour, *run));
            }
            DateToken::Minute(run) => out.push_str(&pad(datetime.minute(), *run)),
            DateToken::Second(run) => out.push_str(&pad(datetime.second(), *run)),
            DateToken::SubSecond(run) => {
                let millis = format!("{:03}", datetime.nanosecond() / 1_000_000);
                out.push('.');
                out.push_str(&millis[..(*run).min(3)]);
            }
            DateToken::AmPm { short } => {
                let pm = datetime.hour() >= 12;
                out.push_str(match (short, pm) {
                    (false, false) => "AM",
                    (false, true) => "PM",
                    (true, false) => "A",
                    (true, true) => "P",
                });
            }
            DateToken::Literal(text) => out.push_str(text),
        }
    }
    out
}
