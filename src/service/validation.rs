//! Request validation for student payloads, applied before anything reaches the store.

use crate::error::AppError;
use crate::model::{NewStudent, StudentPatch};
use regex::Regex;

const NAME_MAX_LENGTH: usize = 255;
const EMAIL_MAX_LENGTH: usize = 320;
const AGE_MIN: i32 = 0;
const AGE_MAX: i32 = 150;
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create payload. `name` is required and non-blank.
    pub fn validate_new(body: &NewStudent) -> Result<(), AppError> {
        validate_name(&body.name)?;
        if let Some(email) = &body.email {
            validate_email(email)?;
        }
        if let Some(age) = body.age {
            validate_age(age)?;
        }
        Ok(())
    }

    /// Validate only the fields present in the patch.
    pub fn validate_patch(body: &StudentPatch) -> Result<(), AppError> {
        if let Some(name) = &body.name {
            validate_name(name)?;
        }
        if let Some(email) = &body.email {
            validate_email(email)?;
        }
        if let Some(age) = body.age {
            validate_age(age)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "name must be at most {} characters",
            NAME_MAX_LENGTH
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let re = Regex::new(EMAIL_PATTERN)
        .map_err(|_| AppError::Validation("invalid pattern for email".into()))?;
    if email.len() > EMAIL_MAX_LENGTH || !re.is_match(email) {
        return Err(AppError::Validation("email must be a valid email".into()));
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), AppError> {
    if !(AGE_MIN..=AGE_MAX).contains(&age) {
        return Err(AppError::Validation(format!(
            "age must be between {} and {}",
            AGE_MIN, AGE_MAX
        )));
    }
    Ok(())
}
