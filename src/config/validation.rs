//! Validation rules applied to a bound record

use crate::{
    error::{AppError, Result},
    models::ConfigRecord,
};
use chrono::NaiveDateTime;

/// Oldest age accepted without a warning
pub const MAX_PLAUSIBLE_AGE: i32 = 150;

/// Record validator; hard violations are errors, doubtful values are warnings
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a record bound from `prefix` against the current time
    pub fn validate_comprehensive(record: &ConfigRecord, prefix: &str) -> Result<Vec<ValidationWarning>> {
        Self::validate_at(record, prefix, chrono::Local::now().naive_local())
    }

    /// Validate a record, judging dates against `now`; messages name keys under `prefix`
    pub fn validate_at(record: &ConfigRecord, prefix: &str, now: NaiveDateTime) -> Result<Vec<ValidationWarning>> {
        Self::validate_required_shapes(record, prefix)?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_age(record.age, prefix));
        warnings.extend(Self::validate_birth_date(record.birth_date, prefix, now));
        warnings.extend(Self::validate_pet(record, prefix));
        warnings.extend(Self::validate_tags(&record.tags, prefix));
        Ok(warnings)
    }

    fn validate_required_shapes(record: &ConfigRecord, prefix: &str) -> Result<()> {
        if let Some(age) = record.age {
            if age < 0 {
                return Err(AppError::validation(format!("{}.age must not be negative, got {}", prefix, age)));
            }
        }

        if let Some(last_name) = &record.last_name {
            if last_name.trim().is_empty() {
                return Err(AppError::validation(format!("{}.last-name is set but blank", prefix)));
            }
        }

        Ok(())
    }

    fn validate_age(age: Option<i32>, prefix: &str) -> Option<ValidationWarning> {
        age.filter(|age| *age > MAX_PLAUSIBLE_AGE).map(|age| {
            ValidationWarning::new(
                ValidationLevel::Warning,
                format!("{}.age is {}, which is above {}", prefix, age, MAX_PLAUSIBLE_AGE),
            )
        })
    }

    fn validate_birth_date(
        birth_date: Option<NaiveDateTime>,
        prefix: &str,
        now: NaiveDateTime,
    ) -> Option<ValidationWarning> {
        birth_date.filter(|date| *date > now).map(|date| {
            ValidationWarning::new(
                ValidationLevel::Warning,
                format!("{}.birth-date {} lies in the future", prefix, date),
            )
        })
    }

    fn validate_pet(record: &ConfigRecord, prefix: &str) -> Option<ValidationWarning> {
        match &record.pet {
            Some(pet) if pet.name.as_deref().map_or(true, |n| n.trim().is_empty()) => Some(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("{}.pet is configured without a name", prefix),
            )),
            _ => None,
        }
    }

    fn validate_tags(tags: &[String], prefix: &str) -> Vec<ValidationWarning> {
        tags.iter()
            .enumerate()
            .filter(|(_, tag)| tag.trim().is_empty())
            .map(|(index, _)| {
                ValidationWarning::new(ValidationLevel::Info, format!("{}.tags[{}] is blank", prefix, index))
            })
            .collect()
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            let level = match self.level {
                ValidationLevel::Info => self.level.as_str().blue(),
                ValidationLevel::Warning => self.level.as_str().yellow(),
            };
            format!("[{}] {}", level, self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pet;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_record_is_valid() {
        let warnings = ConfigValidator::validate_at(&ConfigRecord::default(), "person", now()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_negative_age_is_error() {
        let record = ConfigRecord { age: Some(-1), ..Default::default() };
        let err = ConfigValidator::validate_at(&record, "person", now()).unwrap_err();
        assert_eq!(err.category(), "VALIDATION");
        assert!(err.to_string().contains("person.age must not be negative"));
    }

    #[test]
    fn test_blank_last_name_is_error() {
        let record = ConfigRecord { last_name: Some("  ".to_string()), ..Default::default() };
        assert!(ConfigValidator::validate_comprehensive(&record, "person").is_err());
    }

    #[test]
    fn test_warnings() {
        let record = ConfigRecord {
            age: Some(200),
            birth_date: NaiveDate::from_ymd_opt(2030, 5, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            pet: Some(Pet { name: None, breed: Some("Husky".to_string()) }),
            tags: vec!["a".to_string(), " ".to_string()],
            ..Default::default()
        };

        let warnings = ConfigValidator::validate_at(&record, "person", now()).unwrap();
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].message.contains("above 150"));
        assert!(warnings[1].message.contains("future"));
        assert!(warnings[2].message.contains("without a name"));
        assert_eq!(warnings[3].level, ValidationLevel::Info);
        assert_eq!(warnings[3].format(false), "[INFO] person.tags[1] is blank");
    }

    #[test]
    fn test_messages_follow_bound_prefix() {
        let record = ConfigRecord {
            age: Some(151),
            pet: Some(Pet { name: Some(" ".to_string()), breed: None }),
            ..Default::default()
        };

        let warnings = ConfigValidator::validate_at(&record, "app.owner", now()).unwrap();
        assert_eq!(warnings[0].message, "app.owner.age is 151, which is above 150");
        assert_eq!(warnings[1].message, "app.owner.pet is configured without a name");

        let blank = ConfigRecord { last_name: Some(String::new()), ..Default::default() };
        let err = ConfigValidator::validate_at(&blank, "app.owner", now()).unwrap_err();
        assert!(err.to_string().contains("app.owner.last-name is set but blank"));
    }
}
