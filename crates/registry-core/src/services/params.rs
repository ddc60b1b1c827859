//! Validated parameters for the registration service

use std::borrow::Cow;
use validator::{Validate, ValidateEmail, ValidationError};

#[derive(Debug, Clone, Validate)]
pub struct RegisterStudentsParams {
    #[validate(email(message = "teacher email is not a valid email address"))]
    pub teacher: String,
    #[validate(custom(function = "validate_email_list"))]
    pub students: Vec<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct GetCommonStudentsParams {
    #[validate(custom(function = "validate_email_list"))]
    pub teachers: Vec<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct SendNotificationsParams {
    #[validate(email(message = "teacher email is not a valid email address"))]
    pub teacher: String,
    #[validate(length(min = 1, message = "notification is required"))]
    pub notification: String,
}

#[derive(Debug, Clone, Validate)]
pub struct CreateStudentParams {
    #[validate(email(message = "email is not a valid email address"))]
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct CreateTeacherParams {
    #[validate(email(message = "email is not a valid email address"))]
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct SuspendStudentParams {
    #[validate(email(message = "student email is not a valid email address"))]
    pub student: String,
}

fn validate_email_list(emails: &[String]) -> Result<(), ValidationError> {
    match emails.iter().find(|email| !email.validate_email()) {
        Some(invalid) => Err(ValidationError::new("email").with_message(Cow::Owned(format!(
            "'{}' is not a valid email address",
            invalid
        )))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_params_accept_valid_emails() {
        let params = RegisterStudentsParams {
            teacher: "ken@x.com".to_string(),
            students: vec!["a@x.com".to_string(), "b@x.com".to_string()],
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_register_params_report_invalid_student() {
        let params = RegisterStudentsParams {
            teacher: "ken@x.com".to_string(),
            students: vec!["a@x.com".to_string(), "nope".to_string()],
        };
        let errors = params.validate().unwrap_err();
        let field = errors.field_errors();
        let message = field
            .values()
            .next()
            .and_then(|errs| errs[0].message.clone())
            .unwrap();
        assert_eq!(message, "'nope' is not a valid email address");
    }

    #[test]
    fn test_empty_student_list_is_valid() {
        let params = RegisterStudentsParams {
            teacher: "ken@x.com".to_string(),
            students: Vec::new(),
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_notification_text_is_required() {
        let params = SendNotificationsParams {
            teacher: "ken@x.com".to_string(),
            notification: String::new(),
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let params = CreateTeacherParams {
            email: String::new(),
            name: Some("Ken".to_string()),
        };
        assert!(params.validate().is_err());
    }
}
