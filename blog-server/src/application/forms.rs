//! Field cleaning shared by the form-backed operations.
//!
//! Each helper records messages into a `FormErrors` and hands back the
//! cleaned value, so one submission reports every bad field at once.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::error::FormErrors;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_DATETIME: &str = "Enter a valid date/time.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

pub const TITLE_MAX: usize = 256;
pub const IMAGE_MAX: usize = 100;
pub const USERNAME_MAX: usize = 150;
pub const NAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const PASSWORD_MIN: usize = 8;

fn check_length(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {len})."),
        );
    }
}

/// Trimmed, non-empty, optionally length-capped.
pub fn required_text(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if let Some(max) = max {
        check_length(errors, field, value, max);
    }
    value.to_string()
}

/// Trimmed; blank is allowed.
pub fn optional_text(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) -> String {
    let value = value.trim();
    check_length(errors, field, value, max);
    value.to_string()
}

/// Blank image references clear the field.
pub fn image_reference(errors: &mut FormErrors, value: Option<String>) -> Option<String> {
    let value = value?.trim().to_string();
    if value.is_empty() {
        return None;
    }
    check_length(errors, "image", &value, IMAGE_MAX);
    Some(value)
}

/// RFC 3339, or the `datetime-local` shapes browsers submit (read as UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `Ok(None)` for a blank value.
pub fn optional_datetime(
    errors: &mut FormErrors,
    field: &'static str,
    raw: Option<&str>,
) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse_datetime(raw);
    if parsed.is_none() {
        errors.add(field, INVALID_DATETIME);
    }
    parsed
}

/// Profile URL segments that already name a page.
const RESERVED_USERNAMES: &[&str] = &["edit"];

pub fn username(errors: &mut FormErrors, value: &str) -> String {
    let value = required_text(errors, "username", value, Some(USERNAME_MAX));
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !value.is_empty() && !value.chars().all(allowed) {
        errors.add("username", INVALID_USERNAME);
    } else if RESERVED_USERNAMES.contains(&value.as_str()) {
        errors.add("username", DUPLICATE_USERNAME);
    }
    value
}

/// Shape check only: one `@`, something on both sides, a dot in the domain.
pub fn email(errors: &mut FormErrors, value: &str, required: bool) -> String {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        if required {
            errors.add("email", REQUIRED);
        }
        return value;
    }
    check_length(errors, "email", &value, EMAIL_MAX);
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.add("email", INVALID_EMAIL);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rstest::rstest;

    #[test]
    fn required_text_trims_and_caps() {
        let mut errors = FormErrors::new();
        assert_eq!(required_text(&mut errors, "title", "  hi  ", Some(5)), "hi");
        assert!(errors.is_empty());

        required_text(&mut errors, "title", "   ", Some(5));
        required_text(&mut errors, "text", "toolong", Some(5));
        assert_eq!(errors.field("title"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.field("text").is_some());
    }

    #[rstest]
    #[case("2024-05-01T10:30:00Z", 10, 30)]
    #[case("2024-05-01T12:30:00+02:00", 10, 30)]
    #[case("2024-05-01T10:30", 10, 30)]
    #[case("2024-05-01 10:30:15", 10, 30)]
    fn parses_datetime_shapes(#[case] raw: &str, #[case] hour: u32, #[case] minute: u32) {
        let parsed = parse_datetime(raw).expect("parsed");
        assert_eq!(parsed.year(), 2024);
        assert_eq!((parsed.hour(), parsed.minute()), (hour, minute));
    }

    #[test]
    fn blank_datetime_is_none_without_error() {
        let mut errors = FormErrors::new();
        assert_eq!(optional_datetime(&mut errors, "pub_date", Some("  ")), None);
        assert_eq!(optional_datetime(&mut errors, "pub_date", None), None);
        assert!(errors.is_empty());

        assert_eq!(optional_datetime(&mut errors, "pub_date", Some("tomorrow")), None);
        assert_eq!(errors.field("pub_date"), Some(&[INVALID_DATETIME.to_string()][..]));
    }

    #[rstest]
    #[case("alice", true)]
    #[case("a.l+i-c_e@1", true)]
    #[case("bad name", false)]
    #[case("semi;colon", false)]
    #[case("", false)]
    #[case("edit", false)]
    #[case("editor", true)]
    fn username_rules(#[case] value: &str, #[case] ok: bool) {
        let mut errors = FormErrors::new();
        username(&mut errors, value);
        assert_eq!(errors.is_empty(), ok);
    }

    #[rstest]
    #[case("user@example.com", true)]
    #[case("User@Example.COM", true)]
    #[case("no-at-sign", false)]
    #[case("@example.com", false)]
    #[case("user@localhost", false)]
    #[case("a@b@c.com", false)]
    #[case("user@.com", false)]
    fn email_rules(#[case] value: &str, #[case] ok: bool) {
        let mut errors = FormErrors::new();
        email(&mut errors, value, true);
        assert_eq!(errors.is_empty(), ok);
    }

    #[test]
    fn email_is_lowercased_and_optional_when_allowed() {
        let mut errors = FormErrors::new();
        assert_eq!(email(&mut errors, " Bob@Mail.ORG ", true), "bob@mail.org");
        assert_eq!(email(&mut errors, "", false), "");
        assert!(errors.is_empty());
    }

    #[test]
    fn blank_image_clears_reference() {
        let mut errors = FormErrors::new();
        assert_eq!(image_reference(&mut errors, Some("  ".into())), None);
        assert_eq!(image_reference(&mut errors, None), None);
        assert_eq!(
            image_reference(&mut errors, Some("posts/cat.jpg".into())),
            Some("posts/cat.jpg".into())
        );
        assert!(errors.is_empty());
    }
}
