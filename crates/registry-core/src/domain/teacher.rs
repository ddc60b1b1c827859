//! Teacher domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Teacher {
    #[validate(email(message = "teacher email is not a valid email address"))]
    pub email: String,
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Teacher {
    pub fn new(email: String, name: Option<String>) -> Result<Self, validator::ValidationErrors> {
        let teacher = Self {
            email,
            name: name.map(|n| n.trim().to_string()).unwrap_or_default(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };

        teacher.validate()?;
        Ok(teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_teacher() {
        let teacher = Teacher::new("ken@example.com".to_string(), Some(" Ken ".to_string())).unwrap();
        assert_eq!(teacher.name, "Ken");
        assert!(teacher.updated_at.is_none());
    }

    #[test]
    fn test_rejects_invalid_email() {
        assert!(Teacher::new("ken@".to_string(), None).is_err());
    }
}
