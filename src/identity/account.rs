/// A registered user. `email` is the unique key; records are never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub display_name: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Email already registered!")]
    AlreadyExists,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
}
