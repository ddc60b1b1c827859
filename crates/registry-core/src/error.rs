//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} object not found")]
    NotFound(&'static str),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn teacher_not_found() -> Self {
        DomainError::NotFound("teacher")
    }

    pub fn student_not_found() -> Self {
        DomainError::NotFound("student")
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(flatten_validation_errors(&errors))
    }
}

/// Renders field errors as `field: message` pairs, sorted by field name.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(email(message = "bad teacher"))]
        teacher: String,
        #[validate(length(min = 1))]
        students: Vec<String>,
    }

    #[test]
    fn test_validation_errors_are_flattened() {
        let probe = Probe {
            teacher: "nope".to_string(),
            students: Vec::new(),
        };
        let err = DomainError::from(probe.validate().unwrap_err());
        assert_eq!(
            err,
            DomainError::Validation("students: length; teacher: bad teacher".to_string())
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(DomainError::teacher_not_found().to_string(), "teacher object not found");
        assert_eq!(DomainError::student_not_found().to_string(), "student object not found");
    }
}
