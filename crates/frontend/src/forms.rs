//! Client-side form checks run before anything is sent to the server.

use shared_types::{FoodRecordRequest, RegisterRequest};
use validator::{Validate, ValidationErrors};

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
const MIN_PASSWORD_LEN: usize = 6;

/// Raw values of the registration form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// First failing rule, in field-name order so the message is stable.
pub fn first_error(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| (field, e)))
        .map(|(field, e)| match &e.message {
            Some(message) => message.to_string(),
            None => format!("{} is invalid", field),
        })
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Check the registration form and build the request body.
///
/// Password confirmation is checked before length so the user sees the
/// mismatch first.
pub fn validate_registration(form: &RegistrationForm) -> Result<RegisterRequest, String> {
    if form.password != form.confirm_password {
        return Err(PASSWORD_MISMATCH.to_string());
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PASSWORD_TOO_SHORT.to_string());
    }

    let request = RegisterRequest {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    };
    request.validate().map_err(|e| first_error(&e))?;
    Ok(request)
}

/// Normalize then validate a food record before submitting it.
pub fn validate_record(request: FoodRecordRequest) -> Result<FoodRecordRequest, String> {
    let request = request.normalized();
    request.validate().map_err(|e| first_error(&e))?;
    Ok(request)
}
