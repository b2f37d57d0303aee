//! Read endpoints over the current substitution snapshot.

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use crate::domains::substitutions::{AllSubstitutions, ClassView, Day, DayFilter, DayView};
use crate::server::app::AxumAppState;
use crate::server::ApiError;

#[derive(Debug, Deserialize)]
pub struct ClassQuery {
    /// `today`, `tomorrow` or `both` (default)
    day: Option<String>,
}

pub async fn substitutions_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<AllSubstitutions>, ApiError> {
    state
        .queries
        .get_all()
        .map(Json)
        .map_err(|e| ApiError::from_query(e, "Error fetching substitute plans"))
}

pub async fn today_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<DayView>, ApiError> {
    day_view(&state, Day::Today)
}

pub async fn tomorrow_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<DayView>, ApiError> {
    day_view(&state, Day::Tomorrow)
}

fn day_view(state: &AxumAppState, day: Day) -> Result<Json<DayView>, ApiError> {
    state.queries.get_day(day).map(Json).map_err(|e| {
        ApiError::from_query(e, &format!("Error fetching {}'s substitute plans", day))
    })
}

pub async fn substitutions_by_class_handler(
    Extension(state): Extension<AxumAppState>,
    Path(class_name): Path<String>,
    Query(query): Query<ClassQuery>,
) -> Result<Json<ClassView>, ApiError> {
    let days = DayFilter::from_param(query.day.as_deref());

    tracing::debug!(class = %class_name, ?days, "Class substitution query");

    state
        .queries
        .get_by_class(&class_name, days)
        .map(Json)
        .map_err(|e| ApiError::from_query(e, "Error fetching substitute plans"))
}
