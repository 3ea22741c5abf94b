use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use entity::{NewUser, User};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::{created, Created, FromInput, PageParams, ValidatedJson};
use crate::pagination::Paginated;
use crate::server::State;

/// The JSON input for `POST /users`
#[derive(Debug, Default, Validate, Deserialize)]
pub(crate) struct NewUserInput {
    #[validate(required)]
    pub(crate) name: Option<String>,
    /// Must not already belong to another user; the database enforces this.
    #[validate(required)]
    pub(crate) email: Option<String>,
    /// Stored verbatim.
    #[validate(required)]
    pub(crate) password_hash: Option<String>,
    #[validate(required)]
    pub(crate) role: Option<String>,
}

impl FromInput for NewUser {
    type Input = NewUserInput;

    const FIELDS: &'static [&'static str] = &["name", "email", "password_hash", "role"];

    fn from_input(input: NewUserInput) -> Option<Self> {
        Some(NewUser {
            name: input.name?,
            email: input.email?,
            password_hash: input.password_hash?,
            role: input.role?,
        })
    }
}

/// Handler for `GET /users`
pub(crate) async fn list_users(
    Query(params): Query<PageParams>,
    state: Extension<Arc<State>>,
) -> Result<Json<Paginated<User>>, ApiError> {
    let request = params.page_request()?;

    let listing = state
        .store
        .list_users(request.window()?)
        .await
        .map_err(ApiError::Query)?;

    Ok(Json(Paginated::new("users", request, listing)?))
}

/// Handler for `POST /users`
pub(crate) async fn create_user(
    state: Extension<Arc<State>>,
    ValidatedJson(user): ValidatedJson<NewUser>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    state
        .store
        .create_user(&user)
        .await
        .map_err(ApiError::Database)?;

    tracing::info!(email = %user.email, "user added");
    Ok(created("User added successfully"))
}
