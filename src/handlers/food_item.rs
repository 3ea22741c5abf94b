use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use entity::{FoodItem, NewFoodItem};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::{
    created, int_param, lenient, non_empty, non_zero, Created, FromInput, QueryInt, ValidatedJson,
};
use crate::pagination::{PageRequest, Paginated};
use crate::server::State;
use crate::store::FoodItemFilter;

/// The JSON input for `POST /food_items`
#[derive(Debug, Default, Validate, Deserialize)]
pub(crate) struct NewFoodItemInput {
    /// Owner of the item.
    #[validate(required)]
    pub(crate) user_id: Option<i64>,
    #[validate(required)]
    pub(crate) name: Option<String>,
    #[validate(required)]
    pub(crate) quantity: Option<i64>,
    /// `YYYY-MM-DD`
    #[validate(required)]
    pub(crate) expiry_date: Option<NaiveDate>,
}

impl FromInput for NewFoodItem {
    type Input = NewFoodItemInput;

    const FIELDS: &'static [&'static str] = &["user_id", "name", "quantity", "expiry_date"];

    fn from_input(input: NewFoodItemInput) -> Option<Self> {
        Some(NewFoodItem {
            user_id: input.user_id?,
            name: input.name?,
            quantity: input.quantity?,
            expiry_date: input.expiry_date?,
        })
    }
}

/// The query of `GET /food_items`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FoodItemParams {
    #[serde(default, deserialize_with = "lenient")]
    page: Option<QueryInt>,
    #[serde(default, deserialize_with = "lenient")]
    limit: Option<QueryInt>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    min_quantity: Option<QueryInt>,
    #[serde(default, deserialize_with = "lenient")]
    max_quantity: Option<QueryInt>,
    #[serde(default)]
    expiry_date: Option<String>,
}

impl FoodItemParams {
    fn into_parts(self) -> Result<(PageRequest, FoodItemFilter), ApiError> {
        let filter = FoodItemFilter {
            name: non_empty(self.name),
            min_quantity: non_zero(int_param("min_quantity", self.min_quantity)?),
            max_quantity: non_zero(int_param("max_quantity", self.max_quantity)?),
            expiry_date: non_empty(self.expiry_date),
        };
        let request = PageRequest::new(
            int_param("page", self.page)?,
            int_param("limit", self.limit)?,
        );
        Ok((request, filter))
    }
}

/// Handler for `GET /food_items`
pub(crate) async fn list_food_items(
    Query(params): Query<FoodItemParams>,
    state: Extension<Arc<State>>,
) -> Result<Json<Paginated<FoodItem>>, ApiError> {
    let (request, filter) = params.into_parts()?;
    tracing::debug!(?filter, "listing food items");

    let listing = state
        .store
        .list_food_items(&filter, request.window()?)
        .await
        .map_err(ApiError::Query)?;

    Ok(Json(Paginated::new("food_items", request, listing)?))
}

/// Handler for `POST /food_items`
pub(crate) async fn create_food_item(
    state: Extension<Arc<State>>,
    ValidatedJson(item): ValidatedJson<NewFoodItem>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    state
        .store
        .create_food_item(&item)
        .await
        .map_err(ApiError::Database)?;

    tracing::info!(user_id = item.user_id, name = %item.name, "food item added");
    Ok(created("Food item added successfully"))
}
