use crate::auth::error::{AuthError, AuthResult};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Client-side checks run before a password change is sent.
/// The backend repeats the length check.
pub fn validate_new_password(password: &str, confirmation: &str) -> AuthResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if password != confirmation {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }

    Ok(())
}
