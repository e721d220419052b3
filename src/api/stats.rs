//! JSON endpoints for workout data.

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::sanitize::sanitize;
use super::validation::Validator;
use super::{ApiError, AppState, WorkoutQuery};
use crate::db::{SortDirection, WorkoutFilter, WorkoutSort};
use crate::entities::workouts;
use crate::models::workout::WorkoutStats;

/// Turns query parameters into a filter. Blank values are absent; unknown sort keys are ignored.
fn filter_from_query(query: &WorkoutQuery) -> Result<WorkoutFilter, ApiError> {
    let mut validator = Validator::new();
    let min_duration = validator.optional_int(
        "min_duration",
        &query.min_duration,
        "min_duration must be an integer",
    );
    let max_duration = validator.optional_int(
        "max_duration",
        &query.max_duration,
        "max_duration must be an integer",
    );
    let intensity = validator.optional_intensity(
        "intensity",
        &query.intensity,
        "intensity must be low, medium or high",
    );

    if let Err(errors) = validator.finish() {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::validation(message));
    }

    let mut filter = WorkoutFilter::new();

    let search = sanitize(&query.search);
    if !search.is_empty() {
        filter = filter.search(search);
    }
    if let Some(min) = min_duration {
        filter = filter.min_duration(min);
    }
    if let Some(max) = max_duration {
        filter = filter.max_duration(max);
    }
    if let Some(intensity) = intensity {
        filter = filter.intensity(intensity);
    }
    if let Some(key) = WorkoutSort::parse(query.sort.trim()) {
        let direction = if query.order.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        filter = filter.sort(key, direction);
    }

    Ok(filter)
}

/// GET /api/workouts
pub async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WorkoutQuery>,
) -> Result<Json<Vec<workouts::Model>>, ApiError> {
    let filter = filter_from_query(&query)?;
    let workouts = state.workouts().list(filter).await?;
    Ok(Json(workouts))
}

/// GET /api/workouts/stats
pub async fn workout_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WorkoutStats>, ApiError> {
    Ok(Json(state.workouts().stats().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Intensity;

    fn query(pairs: &[(&str, &str)]) -> WorkoutQuery {
        let mut query = WorkoutQuery::default();
        for (key, value) in pairs {
            let value = (*value).to_string();
            match *key {
                "search" => query.search = value,
                "min_duration" => query.min_duration = value,
                "max_duration" => query.max_duration = value,
                "intensity" => query.intensity = value,
                "sort" => query.sort = value,
                "order" => query.order = value,
                other => panic!("unexpected key {other}"),
            }
        }
        query
    }

    #[test]
    fn test_blank_values_are_absent() {
        let filter = filter_from_query(&query(&[("min_duration", ""), ("intensity", "")])).unwrap();
        assert_eq!(filter, WorkoutFilter::new());
    }

    #[test]
    fn test_filters_are_parsed() {
        let filter = filter_from_query(&query(&[
            ("min_duration", "10"),
            ("max_duration", "60"),
            ("intensity", "high"),
            ("sort", "duration_minutes"),
            ("order", "desc"),
        ]))
        .unwrap();

        assert_eq!(
            filter,
            WorkoutFilter::new()
                .min_duration(10)
                .max_duration(60)
                .intensity(Intensity::High)
                .sort(WorkoutSort::DurationMinutes, SortDirection::Desc)
        );
    }

    #[test]
    fn test_unknown_sort_is_ignored() {
        let filter = filter_from_query(&query(&[("sort", "unknown_column")])).unwrap();
        assert_eq!(filter.sort, None);
    }

    #[test]
    fn test_non_numeric_duration_is_rejected() {
        assert!(filter_from_query(&query(&[("min_duration", "ten")])).is_err());
        assert!(filter_from_query(&query(&[("intensity", "extreme")])).is_err());
    }
}
