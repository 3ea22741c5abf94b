use serde::Serialize;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    /// Stored as given by the client; this service never hashes or checks it.
    pub password_hash: String,
    pub role: String,
}

/// Column values for a `users` insert. `user_id` is generated by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
