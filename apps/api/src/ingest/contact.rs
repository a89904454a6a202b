//! Contact-detail extraction from raw resume text. Best-effort only; these
//! fields feed report presentation and never influence scoring.

use std::sync::OnceLock;

use regex::Regex;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").expect("valid regex")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\+?\d{1,3}[-.\s]?)?\d{10}").expect("valid regex")
    })
}

pub fn extract_email(text: &str) -> Option<String> {
    email_re().find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    phone_re().find(text).map(|m| m.as_str().to_string())
}

/// Guesses the candidate name from the header lines: the first short line
/// that is not contact info or a URL.
pub fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .take(15)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            words.len() <= 4
                && !line.contains('@')
                && !line.to_lowercase().contains("http")
                && line.chars().filter(|c| c.is_ascii_digit()).count() < 3
                && words
                    .iter()
                    .all(|w| w.chars().next().is_some_and(|c| c.is_alphabetic()))
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Priya Sharma\nData Engineer\npriya.sharma@example.com\n+91 9876543210\nhttps://github.com/priyasharma\n";

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email(SAMPLE).as_deref(),
            Some("priya.sharma@example.com")
        );
        assert_eq!(extract_email("no contact details here"), None);
    }

    #[test]
    fn test_extract_phone_with_country_code() {
        let phone = extract_phone(SAMPLE).unwrap();
        assert!(phone.contains("9876543210"));
    }

    #[test]
    fn test_extract_phone_bare_ten_digits() {
        assert_eq!(extract_phone("call 9876543210 now").as_deref(), Some("9876543210"));
        assert_eq!(extract_phone("only 12345"), None);
    }

    #[test]
    fn test_extract_name_first_plausible_header_line() {
        assert_eq!(extract_name(SAMPLE).as_deref(), Some("Priya Sharma"));
    }

    #[test]
    fn test_extract_name_skips_contact_lines() {
        let text = "jane@example.com\nhttps://janedoe.dev\nJane Doe\n";
        assert_eq!(extract_name(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_extract_name_none_for_empty_text() {
        assert_eq!(extract_name(""), None);
    }
}
