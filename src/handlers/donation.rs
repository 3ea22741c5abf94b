use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use entity::{DonationRecord, NewDonation};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::{
    created, int_param, lenient, non_empty, non_zero, Created, FromInput, QueryInt, ValidatedJson,
};
use crate::pagination::{PageRequest, Paginated};
use crate::server::State;
use crate::store::DonationFilter;

/// The JSON input for `POST /donations`
#[derive(Debug, Default, Validate, Deserialize)]
pub(crate) struct NewDonationInput {
    #[validate(required)]
    pub(crate) food_id: Option<i64>,
    #[validate(required)]
    pub(crate) donor_id: Option<i64>,
    #[validate(required)]
    pub(crate) recipient_id: Option<i64>,
}

impl FromInput for NewDonation {
    type Input = NewDonationInput;

    const FIELDS: &'static [&'static str] = &["food_id", "donor_id", "recipient_id"];

    fn from_input(input: NewDonationInput) -> Option<Self> {
        Some(NewDonation {
            food_id: input.food_id?,
            donor_id: input.donor_id?,
            recipient_id: input.recipient_id?,
        })
    }
}

/// The query of `GET /donations`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DonationParams {
    #[serde(default, deserialize_with = "lenient")]
    page: Option<QueryInt>,
    #[serde(default, deserialize_with = "lenient")]
    limit: Option<QueryInt>,
    #[serde(default, deserialize_with = "lenient")]
    donor_id: Option<QueryInt>,
    #[serde(default, deserialize_with = "lenient")]
    recipient_id: Option<QueryInt>,
    #[serde(default)]
    donation_date: Option<String>,
}

impl DonationParams {
    fn into_parts(self) -> Result<(PageRequest, DonationFilter), ApiError> {
        let filter = DonationFilter {
            donor_id: non_zero(int_param("donor_id", self.donor_id)?),
            recipient_id: non_zero(int_param("recipient_id", self.recipient_id)?),
            donation_date: non_empty(self.donation_date),
        };
        let request = PageRequest::new(
            int_param("page", self.page)?,
            int_param("limit", self.limit)?,
        );
        Ok((request, filter))
    }
}

/// Handler for `GET /donations`
pub(crate) async fn list_donations(
    Query(params): Query<DonationParams>,
    state: Extension<Arc<State>>,
) -> Result<Json<Paginated<DonationRecord>>, ApiError> {
    let (request, filter) = params.into_parts()?;
    tracing::debug!(?filter, "listing donations");

    let listing = state
        .store
        .list_donations(&filter, request.window()?)
        .await
        .map_err(ApiError::Query)?;

    Ok(Json(Paginated::new("donations", request, listing)?))
}

/// Handler for `POST /donations`
pub(crate) async fn create_donation(
    state: Extension<Arc<State>>,
    ValidatedJson(donation): ValidatedJson<NewDonation>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    state
        .store
        .create_donation(&donation)
        .await
        .map_err(ApiError::Database)?;

    tracing::info!(
        food_id = donation.food_id,
        donor_id = donation.donor_id,
        recipient_id = donation.recipient_id,
        "donation logged"
    );
    Ok(created("Donation logged successfully"))
}
