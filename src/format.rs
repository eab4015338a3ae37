//! Text rendering of samples. One sample per line: an optional fixed label followed by the
//! decimal value. The sink appends the line terminator.

use crate::Sample;

/// Renders a sample as its decimal representation, preceded by `label` if present.
pub fn format_sample(label: Option<&str>, value: Sample) -> String {
    match label {
        Some(label) => format!("{label}{value}"),
        None => value.to_string(),
    }
}

/// Parses a line produced by [`format_sample`], with or without its `"\n"` or `"\r\n"`
/// terminator. Returns `None` if the label does not match or anything other than decimal
/// digits follows it.
pub fn parse_sample_line(label: Option<&str>, line: &str) -> Option<Sample> {
    let line = match line.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => line,
    };
    let digits = match label {
        Some(label) => line.strip_prefix(label)?,
        None => line,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test0_zero_is_rendered() {
        assert_eq!(format_sample(None, 0), "0");
        assert_eq!(format_sample(Some("EEG reading: "), 0), "EEG reading: 0");
    }

    #[test]
    fn test1_boundaries_render_unchanged() {
        assert_eq!(format_sample(None, 4095), "4095");
        assert_eq!(format_sample(None, u16::MAX), "65535");
        assert_eq!(parse_sample_line(None, "4095\n"), Some(4095));
        assert_eq!(parse_sample_line(None, "0\n"), Some(0));
    }

    #[test]
    fn test2_parse_accepts_crlf_and_bare_lines() {
        assert_eq!(parse_sample_line(None, "1042\r\n"), Some(1042));
        assert_eq!(parse_sample_line(None, "1042"), Some(1042));
        assert_eq!(parse_sample_line(Some("EEG reading: "), "EEG reading: 1042\n"), Some(1042));
    }

    #[test]
    fn test3_parse_rejects_foreign_characters() {
        assert_eq!(parse_sample_line(None, ""), None);
        assert_eq!(parse_sample_line(None, "\n"), None);
        assert_eq!(parse_sample_line(None, " 12"), None);
        assert_eq!(parse_sample_line(None, "-1"), None);
        assert_eq!(parse_sample_line(None, "12a"), None);
        assert_eq!(parse_sample_line(None, "12\n\n"), None);
    }

    #[test]
    fn test4_parse_requires_exact_label() {
        assert_eq!(parse_sample_line(Some("EEG reading: "), "1042"), None);
        assert_eq!(parse_sample_line(Some("EEG reading: "), "EEG reading:1042"), None);
        assert_eq!(parse_sample_line(None, "EEG reading: 1042"), None);
    }

    #[test]
    fn test5_parse_rejects_values_wider_than_a_sample() {
        assert_eq!(parse_sample_line(None, "65536"), None);
    }
}
