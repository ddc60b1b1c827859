//! Student domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Student {
    #[validate(email(message = "student email is not a valid email address"))]
    pub email: String,
    pub name: String,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn new(email: String, name: Option<String>) -> Result<Self, validator::ValidationErrors> {
        let student = Self {
            email,
            name: name.map(|n| n.trim().to_string()).unwrap_or_default(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };

        student.validate()?;
        Ok(student)
    }
}
