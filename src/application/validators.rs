use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Usernames: 3-50 characters, no surrounding whitespace, no control characters.
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=50).contains(&len)
        && username.trim() == username
        && !username.chars().any(|c| c.is_control())
}

/// Project names: 1-100 visible characters after trimming.
pub fn is_valid_project_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= 100
}

/// Passwords: 8-128 characters. bcrypt ignores input past 72 bytes, so longer secrets add nothing.
pub fn is_valid_password(password: &str) -> bool {
    (8..=128).contains(&password.chars().count())
}
