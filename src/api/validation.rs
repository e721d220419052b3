//! Field rules for form and query input.
//!
//! A [`Validator`] collects every failure in the order the rules run, so a form can show
//! the complete list at once. Rules that parse return the parsed value when it is valid.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::domain::Intensity;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Fails on empty or whitespace-only input.
    pub fn required(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.reject(field, message);
            return false;
        }
        true
    }

    pub fn email(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = get_regex(&RE, r"^[^\s@]+@[^\s@]+\.[^\s@]+$");

        if !re.is_match(value.trim()) {
            self.reject(field, message);
            return false;
        }
        true
    }

    /// Reports each failing password class separately.
    pub fn password_strength(&mut self, field: &'static str, value: &str) -> bool {
        let before = self.errors.len();

        if value.chars().count() < 8 {
            self.reject(field, "Password must be at least 8 characters long");
        }
        if !value.chars().any(|c| c.is_ascii_lowercase()) {
            self.reject(field, "Password must contain a lowercase letter");
        }
        if !value.chars().any(|c| c.is_ascii_uppercase()) {
            self.reject(field, "Password must contain an uppercase letter");
        }
        if !value.chars().any(|c| c.is_ascii_digit()) {
            self.reject(field, "Password must contain a number");
        }
        if !value.chars().any(|c| !c.is_ascii_alphanumeric()) {
            self.reject(field, "Password must contain a special character");
        }

        self.errors.len() == before
    }

    /// An integer > 0.
    pub fn positive_int(&mut self, field: &'static str, value: &str, message: &str) -> Option<i32> {
        match value.trim().parse::<i32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                self.reject(field, message);
                None
            }
        }
    }

    /// Blank is absent. Anything else must be an integer >= 0.
    pub fn optional_non_negative_int(
        &mut self,
        field: &'static str,
        value: &str,
        message: &str,
    ) -> Option<i32> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        match value.parse::<i32>() {
            Ok(n) if n >= 0 => Some(n),
            _ => {
                self.reject(field, message);
                None
            }
        }
    }

    /// Blank is absent. Anything else must be an integer.
    pub fn optional_int(&mut self, field: &'static str, value: &str, message: &str) -> Option<i32> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        value.parse::<i32>().map_or_else(
            |_| {
                self.reject(field, message);
                None
            },
            Some,
        )
    }

    /// Blank is absent. Accepts an ISO-8601 date or date-time and keeps the date part.
    pub fn optional_iso_date(
        &mut self,
        field: &'static str,
        value: &str,
        message: &str,
    ) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let parsed = parse_iso_date(value);
        if parsed.is_none() {
            self.reject(field, message);
        }
        parsed
    }

    /// Blank is absent. Anything else must name a known intensity.
    pub fn optional_intensity(
        &mut self,
        field: &'static str,
        value: &str,
        message: &str,
    ) -> Option<Intensity> {
        if value.trim().is_empty() {
            return None;
        }

        value.parse::<Intensity>().map_or_else(
            |_| {
                self.reject(field, message);
                None
            },
            Some,
        )
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// # Errors
    ///
    /// Returns every collected failure, in the order it was found.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(result: Result<(), Vec<FieldError>>) -> Vec<String> {
        result
            .unwrap_err()
            .into_iter()
            .map(|e| e.message)
            .collect()
    }

    #[test]
    fn test_required() {
        let mut v = Validator::new();
        assert!(v.required("title", "Run", "Title is required"));
        assert!(!v.required("notes", "   ", "Notes are required"));
        assert_eq!(messages(v.finish()), vec!["Notes are required"]);
    }

    #[test]
    fn test_email() {
        let mut v = Validator::new();
        assert!(v.email("email", "a@b.co", "bad"));
        assert!(!v.email("email", "not-an-email", "bad"));
        assert!(!v.email("email", "a@b", "bad"));
        assert!(!v.email("email", "a b@c.d", "bad"));
    }

    #[test]
    fn test_password_reports_every_failing_class() {
        let mut v = Validator::new();
        assert!(!v.password_strength("password", "abc"));
        assert_eq!(
            messages(v.finish()),
            vec![
                "Password must be at least 8 characters long",
                "Password must contain an uppercase letter",
                "Password must contain a number",
                "Password must contain a special character",
            ]
        );

        let mut v = Validator::new();
        assert!(v.password_strength("password", "Str0ng!pass"));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_positive_int() {
        let mut v = Validator::new();
        assert_eq!(v.positive_int("d", "45", "bad"), Some(45));
        assert_eq!(v.positive_int("d", "0", "bad"), None);
        assert_eq!(v.positive_int("d", "-3", "bad"), None);
        assert_eq!(v.positive_int("d", "ten", "bad"), None);
        assert_eq!(v.finish().unwrap_err().len(), 3);
    }

    #[test]
    fn test_optional_non_negative_int() {
        let mut v = Validator::new();
        assert_eq!(v.optional_non_negative_int("m", "", "bad"), None);
        assert_eq!(v.optional_non_negative_int("m", "0", "bad"), Some(0));
        assert!(v.is_valid());
        assert_eq!(v.optional_non_negative_int("m", "-1", "bad"), None);
        assert!(!v.is_valid());
    }

    #[test]
    fn test_iso_dates_are_normalized() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let mut v = Validator::new();
        assert_eq!(v.optional_iso_date("at", "2025-03-09", "bad"), Some(date));
        assert_eq!(
            v.optional_iso_date("at", "2025-03-09T18:30:00Z", "bad"),
            Some(date)
        );
        assert_eq!(v.optional_iso_date("at", "2025-03-09T07:00:00", "bad"), Some(date));
        assert_eq!(v.optional_iso_date("at", "", "bad"), None);
        assert!(v.is_valid());

        assert_eq!(v.optional_iso_date("at", "09/03/2025", "bad"), None);
        assert_eq!(v.optional_iso_date("at", "2025-02-30", "bad"), None);
        assert_eq!(v.finish().unwrap_err().len(), 2);
    }

    #[test]
    fn test_optional_intensity() {
        let mut v = Validator::new();
        assert_eq!(v.optional_intensity("i", "", "bad"), None);
        assert_eq!(v.optional_intensity("i", "High", "bad"), Some(Intensity::High));
        assert!(v.is_valid());
        assert_eq!(v.optional_intensity("i", "extreme", "bad"), None);
        assert!(!v.is_valid());
    }
}
