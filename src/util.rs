// Utility helpers for parsing and formatting.
//
// This module centralizes the "dirty" spreadsheet number handling so the
// rest of the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Trim a string-like value; blank becomes `None`.
pub fn clean_text(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse a spreadsheet number while being forgiving about the formatting
/// issues common in exports from pt-BR spreadsheets.
///
/// - Trims whitespace and a trailing `%`.
/// - Rejects values that contain alphabetic characters.
/// - A lone `,` is read as the decimal separator (`75,5`).
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim_end();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let v = if !s.contains('.') && s.matches(',').count() == 1 {
        s.replace(',', ".").parse::<f64>().ok()?
    } else {
        s.parse::<f64>().ok()?
    };
    v.is_finite().then_some(v)
}

/// Edition years arrive as `2023` or as a float with a zero fraction
/// (`2023.0`) when the spreadsheet typed the column as numeric.
///
/// `Ok(None)` means the value is missing, `Err(())` that it is not a whole
/// number.
pub(crate) fn parse_whole_number(s: Option<&str>) -> Result<Option<i64>, ()> {
    let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(v) = s.parse::<i64>() {
        return Ok(Some(v));
    }
    let v = parse_f64_safe(Some(s)).ok_or(())?;
    if v.fract() != 0.0 || v.abs() > i64::MAX as f64 {
        return Err(());
    }
    Ok(Some(v as i64))
}

/// `95.5%`: one decimal place, same as the on-screen tables.
pub fn format_percent(v: f64) -> String {
    format!("{:.1}%", v)
}

/// Signed difference with two decimals, `+5.50` / `-1.25` / `0.00`.
pub fn format_delta(v: f64) -> String {
    if v > 0.0 {
        format!("+{:.2}", v)
    } else if v < 0.0 {
        format!("{:.2}", v)
    } else {
        "0.00".to_string()
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages use pt-BR grouping (`9.855 linhas`).
    n.to_formatted_string(&Locale::pt)
}

/// Shorten `s` to at most `max_chars` characters, ending with an ellipsis.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_comma_and_percent_sign() {
        assert_eq!(parse_f64_safe(Some(" 75,5 ")), Some(75.5));
        assert_eq!(parse_f64_safe(Some("75.5%")), Some(75.5));
        assert_eq!(parse_f64_safe(Some("abc")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn whole_numbers_accept_zero_fraction_only() {
        assert_eq!(parse_whole_number(Some("2023")), Ok(Some(2023)));
        assert_eq!(parse_whole_number(Some("2023.0")), Ok(Some(2023)));
        assert_eq!(parse_whole_number(Some("2023.5")), Err(()));
        assert_eq!(parse_whole_number(Some("   ")), Ok(None));
        assert_eq!(parse_whole_number(Some("ano")), Err(()));
    }

    #[test]
    fn formats_percent_and_delta() {
        assert_eq!(format_percent(88.24), "88.2%");
        assert_eq!(format_percent(95.5), "95.5%");
        assert_eq!(format_delta(5.5), "+5.50");
        assert_eq!(format_delta(-1.0), "-1.00");
        assert_eq!(format_delta(0.0), "0.00");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("Escola", 10), "Escola");
        assert_eq!(truncate_chars("Educação Infantil", 5), "Educ…");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("A & B <C>"), "A &amp; B &lt;C&gt;");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_int(9855), "9.855");
    }
}
