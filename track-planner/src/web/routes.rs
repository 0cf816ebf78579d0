//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::planner::Planner;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/train-schedule", get(train_schedule))
        .route("/api/stations", get(list_stations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the query form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let template = IndexTemplate {
        stations: state.timetable.station_names().iter().cloned().collect(),
    };
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// All station names, sorted.
async fn list_stations(State(state): State<AppState>) -> Json<StationsResponse> {
    Json(StationsResponse {
        stations: state.timetable.station_names().iter().cloned().collect(),
    })
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Plan a trip between two stations.
async fn train_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ScheduleParams>,
) -> Response {
    let html = accepts_html(&headers);
    match schedule(&state, &params, html).await {
        Ok(response) => response,
        Err(e) if html => e.into_html_response(),
        Err(e) => e.into_response(),
    }
}

async fn schedule(
    state: &AppState,
    params: &ScheduleParams,
    html: bool,
) -> Result<Response, AppError> {
    let query = params.to_query(&state.timetable)?;

    let timetable = state.timetable.clone();
    let config = state.config.clone();
    let result = state
        .cache
        .get_or_compute(&query, move |q| Planner::new(&timetable, &config).compute(q))
        .await
        .map_err(|e| AppError::Internal {
            message: e.to_string(),
        })?;

    debug!(
        start = %result.start,
        end = %result.end,
        direct = result.direct.len(),
        transfers = result.transfers.len(),
        "schedule served"
    );

    if html {
        let template = ScheduleTemplate {
            view: ScheduleView::new(&result, Local::now().date_naive()),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(&*result).into_response())
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::Internal { .. } => warn!(status = %self.status(), error = %self, "request failed"),
            _ => debug!(status = %self.status(), error = %self, "request rejected"),
        }
    }

    /// Render the error as an HTML page.
    pub fn into_html_response(self) -> Response {
        self.log();
        let template = ErrorTemplate {
            title: "查询错误".to_string(),
            message: self.to_string(),
        };
        match template.render() {
            Ok(html) => (self.status(), Html(html)).into_response(),
            Err(_) => (self.status(), self.to_string()).into_response(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, ScheduleCache};
    use crate::domain::{ClockTime, QueryResult, Station, StationId, StopEvent, Track, TrackId, TrainRun};
    use crate::planner::PlannerConfig;
    use crate::timetable::Timetable;
    use axum::body::to_bytes;
    use axum::http::HeaderValue;

    fn state() -> AppState {
        let t = |s: &str| ClockTime::parse_hhmm(s).ok();
        let track = Track::new(
            TrackId(240),
            "东环",
            vec![
                Station::new(StationId(1), "竹料", 1),
                Station::new(StationId(2), "嘉禾望岗", 2),
                Station::new(StationId(3), "科韵路", 3),
            ],
            vec![TrainRun::new(
                "S4731",
                vec![
                    StopEvent::new(StationId(1), t("07:29")),
                    StopEvent::new(StationId(2), t("07:40")),
                    StopEvent::new(StationId(3), t("08:02")),
                ],
            )],
        );
        AppState::new(
            Timetable::new(vec![track]),
            PlannerConfig::default(),
            ScheduleCache::new(&CacheConfig::default()),
        )
    }

    fn params(start: &str, end: &str, time: Option<&str>) -> Query<ScheduleParams> {
        Query(ScheduleParams {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            depart_time: time.map(String::from),
        })
    }

    fn html_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn accepts_html_header() {
        assert!(accepts_html(&html_headers()));
        assert!(!accepts_html(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn schedule_json() {
        let response = train_schedule(
            State(state()),
            HeaderMap::new(),
            params("竹料", "科韵路", Some("07:20")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let result: QueryResult = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(result.direct.len(), 1);
        assert_eq!(result.direct[0].train_name, "S4731");
        assert_eq!(result.direct[0].duration_minutes, 33);
        assert!(result.transfers.is_empty());
    }

    #[tokio::test]
    async fn schedule_html() {
        let response =
            train_schedule(State(state()), html_headers(), params("竹料", "科韵路", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("S4731"));
        assert!(body.contains("33m"));
    }

    #[tokio::test]
    async fn same_station_is_bad_request() {
        let response =
            train_schedule(State(state()), HeaderMap::new(), params("竹料", "竹料", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(error.error, "Start and end stations cannot be the same.");
    }

    #[tokio::test]
    async fn unknown_station_html_error_page() {
        let response =
            train_schedule(State(state()), html_headers(), params("竹料", "火星", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_string(response).await;
        assert!(body.contains("One or both stations not found in the system."));
    }

    #[tokio::test]
    async fn missing_params_is_bad_request() {
        let response = train_schedule(
            State(state()),
            HeaderMap::new(),
            Query(ScheduleParams::default()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let state = state();
        for _ in 0..2 {
            let response = train_schedule(
                State(state.clone()),
                HeaderMap::new(),
                params("竹料", "科韵路", None),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        state.cache.run_pending_tasks().await;
        assert_eq!(state.cache.entry_count(), 1);
    }

    #[tokio::test]
    async fn stations_listed() {
        let Json(response) = list_stations(State(state())).await;
        assert_eq!(response.stations, vec!["嘉禾望岗", "科韵路", "竹料"]);
    }

    #[tokio::test]
    async fn index_lists_stations() {
        let Html(body) = index_page(State(state())).await.unwrap();
        assert!(body.contains("竹料"));
        assert!(body.contains("/train-schedule"));
    }
}
