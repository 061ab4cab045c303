use once_cell::sync::Lazy;
use regex::Regex;

use crate::auth::Role;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub type FieldResult = Result<(), String>;

/// Returns the value when present and non-empty.
pub fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, String> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("{field} is required")),
    }
}

pub fn email(value: &str) -> FieldResult {
    if EMAIL_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err("invalid email format".to_string())
    }
}

/// Length in characters.
pub fn char_len(field: &str, value: &str, min: usize, max: usize) -> FieldResult {
    bounded(field, value.chars().count(), min, max)
}

/// Length in bytes.
pub fn byte_len(field: &str, value: &str, min: usize, max: usize) -> FieldResult {
    bounded(field, value.len(), min, max)
}

fn bounded(field: &str, len: usize, min: usize, max: usize) -> FieldResult {
    if len < min {
        Err(format!("{field} is too short"))
    } else if len > max {
        Err(format!("{field} is too long"))
    } else {
        Ok(())
    }
}

pub fn role(field: &str, value: &str) -> Result<Role, String> {
    Role::try_from(value).map_err(|_| {
        let allowed: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
        format!("{field} must be one of: {}", allowed.join(" "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_empty() {
        assert_eq!(
            required("email", &None).unwrap_err(),
            "email is required"
        );
        assert_eq!(
            required("email", &Some(String::new())).unwrap_err(),
            "email is required"
        );
        assert_eq!(required("email", &Some("a".into())), Ok("a"));
    }

    #[test]
    fn email_shape() {
        assert!(email("a@x.io").is_ok());
        assert!(email("first.last+tag@school.example.org").is_ok());
        assert_eq!(email("not-an-email").unwrap_err(), "invalid email format");
        assert!(email("a@x").is_err());
        assert!(email("@x.io").is_err());
    }

    #[test]
    fn lengths_report_direction() {
        assert_eq!(char_len("name", "A", 2, 100).unwrap_err(), "name is too short");
        assert_eq!(
            char_len("name", &"n".repeat(101), 2, 100).unwrap_err(),
            "name is too long"
        );
        assert!(char_len("name", "Zoë", 2, 3).is_ok());
        assert_eq!(
            byte_len("password", "Zoë", 2, 3).unwrap_err(),
            "password is too long"
        );
    }

    #[test]
    fn role_lists_allowed_values() {
        assert_eq!(role("role", "teacher"), Ok(Role::Teacher));
        assert_eq!(
            role("role", "admin").unwrap_err(),
            "role must be one of: teacher student"
        );
    }
}
