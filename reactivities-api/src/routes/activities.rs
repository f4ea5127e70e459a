use activities::{
    ActivityDetails, ActivityId, CreateActivity, DeleteActivity, EditActivity, Fault,
    ListActivities, RequestShape, UpdateAttendance, UserId,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    adapters::inbound::http::{ActivityBody, ActivityResponse},
    app_state::AppState,
    auth::ActingUser,
    routes::{
        extract::{ApiJson, ApiPath},
        ApiError,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route(
            "/:id",
            get(activity_details)
                .put(edit_activity)
                .delete(delete_activity),
        )
        .route("/:id/attend", post(update_attendance))
}

/// Dispatches `request` and unwraps its outcome.
///
/// The token is cancelled when this future is dropped, so a client hanging
/// up abandons the store work in flight.
async fn send<R: RequestShape>(app_state: &AppState, request: R) -> Result<R::Output, ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let outcome = app_state.dispatcher.send(request, &cancel).await?;
    Ok(outcome.into_result()?)
}

/// 403 when the activity exists and `user` is not its host. A missing
/// activity passes so the handler can report it as not found.
async fn ensure_host(app_state: &AppState, user: &UserId, id: ActivityId) -> Result<(), ApiError> {
    let is_host = app_state
        .host_policy
        .is_host(user, id)
        .await
        .map_err(Fault::from)?;

    match is_host {
        Some(false) => Err(ApiError::forbidden(
            "Only the host can modify this activity",
        )),
        Some(true) | None => Ok(()),
    }
}

#[instrument(name = "GET /activities", skip(app_state))]
async fn list_activities(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let activities = send(&app_state, ListActivities).await?;

    Ok(Json(
        activities.into_iter().map(ActivityResponse::from).collect(),
    ))
}

#[instrument(name = "GET /activities/:id", skip(app_state))]
async fn activity_details(
    State(app_state): State<AppState>,
    ApiPath(id): ApiPath<ActivityId>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let activity = send(&app_state, ActivityDetails { id }).await?;

    Ok(Json(activity.into()))
}

#[instrument(name = "POST /activities", skip(app_state, body))]
async fn create_activity(
    ActingUser(user): ActingUser,
    State(app_state): State<AppState>,
    ApiJson(body): ApiJson<ActivityBody>,
) -> Result<StatusCode, ApiError> {
    let request = CreateActivity {
        draft: body.into(),
        creator: user,
    };
    send(&app_state, request).await?;

    Ok(StatusCode::OK)
}

#[instrument(name = "PUT /activities/:id", skip(app_state, body))]
async fn edit_activity(
    ActingUser(user): ActingUser,
    State(app_state): State<AppState>,
    ApiPath(id): ApiPath<ActivityId>,
    ApiJson(body): ApiJson<ActivityBody>,
) -> Result<StatusCode, ApiError> {
    ensure_host(&app_state, &user, id).await?;

    let request = EditActivity {
        id,
        draft: body.into(),
    };
    send(&app_state, request).await?;

    Ok(StatusCode::OK)
}

#[instrument(name = "DELETE /activities/:id", skip(app_state))]
async fn delete_activity(
    ActingUser(user): ActingUser,
    State(app_state): State<AppState>,
    ApiPath(id): ApiPath<ActivityId>,
) -> Result<StatusCode, ApiError> {
    ensure_host(&app_state, &user, id).await?;

    send(&app_state, DeleteActivity { id }).await?;

    Ok(StatusCode::OK)
}

#[instrument(name = "POST /activities/:id/attend", skip(app_state))]
async fn update_attendance(
    ActingUser(user): ActingUser,
    State(app_state): State<AppState>,
    ApiPath(id): ApiPath<ActivityId>,
) -> Result<StatusCode, ApiError> {
    send(&app_state, UpdateAttendance { id, user }).await?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use activities::InMemoryActivityStore;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{auth::USER_ID_HEADER, router};

    struct TestApp {
        state: AppState,
    }

    impl TestApp {
        fn new() -> Self {
            Self::with_store(InMemoryActivityStore::new())
        }

        fn with_store(store: InMemoryActivityStore) -> Self {
            Self {
                state: AppState::new(Arc::new(store)),
            }
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            user: Option<&str>,
            body: Option<Value>,
        ) -> Response {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(user) = user {
                request = request.header(USER_ID_HEADER, user);
            }
            let body = match body {
                Some(body) => {
                    request = request.header("content-type", "application/json");
                    Body::from(body.to_string())
                }
                None => Body::empty(),
            };

            router::create(self.state.clone(), "http://localhost:3000".to_string())
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap()
        }

        async fn list(&self) -> Vec<Value> {
            let response = self.call("GET", "/api/activities", None, None).await;
            assert_eq!(response.status(), StatusCode::OK);
            match json_body(response).await {
                Value::Array(activities) => activities,
                other => panic!("expected an array, got {other}"),
            }
        }

        /// Creates an activity hosted by `host` and returns its id.
        async fn create(&self, host: &str, title: &str) -> String {
            let response = self
                .call(
                    "POST",
                    "/api/activities",
                    Some(host),
                    Some(activity_body(title)),
                )
                .await;
            assert_eq!(response.status(), StatusCode::OK);

            let activities = self.list().await;
            let created = activities
                .iter()
                .find(|a| a["title"] == title)
                .expect("created activity is listed");
            created["id"].as_str().unwrap().to_string()
        }
    }

    fn activity_body(title: &str) -> Value {
        json!({
            "title": title,
            "description": "5k along the river",
            "category": "running",
            "date": "2026-11-01T09:00:00Z",
            "city": "X",
            "venue": "Y",
        })
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_then_list_shows_host() {
        let app = TestApp::new();

        let id = app.create("u1", "Run Club").await;

        let activities = app.list().await;
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0]["id"], id.as_str());
        assert_eq!(activities[0]["hostId"], "u1");
        assert_eq!(activities[0]["isCancelled"], false);
        assert_eq!(activities[0]["date"], "2026-11-01T09:00:00Z");
    }

    #[tokio::test]
    async fn create_without_user_is_401() {
        let app = TestApp::new();

        let response = app
            .call("POST", "/api/activities", None, Some(activity_body("Run Club")))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_create_is_400_with_all_violations() {
        let app = TestApp::new();

        let response = app
            .call(
                "POST",
                "/api/activities",
                Some("u1"),
                Some(json!({ "title": "Run Club", "city": "X" })),
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("Description is required"));
        assert!(error.contains("Date is required"));
        assert!(error.contains("Venue is required"));
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn details_of_unknown_activity_is_404() {
        let app = TestApp::new();

        let uri = format!("/api/activities/{}", ActivityId::generate());
        let response = app.call("GET", &uri, None, None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Activity not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_id_is_a_json_400() {
        let app = TestApp::new();

        let response = app
            .call("GET", "/api/activities/not-a-uuid", None, None)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_error() {
        let app = TestApp::new();
        let request = Request::builder()
            .method("POST")
            .uri("/api/activities")
            .header(USER_ID_HEADER, "u1")
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();

        let response = router::create(app.state.clone(), "http://localhost:3000".to_string())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn details_returns_the_activity() {
        let app = TestApp::new();
        let id = app.create("u1", "Run Club").await;

        let response = app
            .call("GET", &format!("/api/activities/{id}"), None, None)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["title"], "Run Club");
        assert_eq!(body["attendees"][0]["userId"], "u1");
    }

    #[tokio::test]
    async fn only_the_host_may_edit_or_delete() {
        let app = TestApp::new();
        let id = app.create("u1", "Run Club").await;
        let uri = format!("/api/activities/{id}");

        let edit = app
            .call("PUT", &uri, Some("u2"), Some(activity_body("Hijacked")))
            .await;
        let delete = app.call("DELETE", &uri, Some("u2"), None).await;

        assert_eq!(edit.status(), StatusCode::FORBIDDEN);
        assert_eq!(delete.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.list().await[0]["title"], "Run Club");
    }

    #[tokio::test]
    async fn host_edits_and_deletes() {
        let app = TestApp::new();
        let id = app.create("u1", "Run Club").await;
        let uri = format!("/api/activities/{id}");

        let edit = app
            .call("PUT", &uri, Some("u1"), Some(activity_body("Trail Club")))
            .await;
        assert_eq!(edit.status(), StatusCode::OK);
        assert_eq!(app.list().await[0]["title"], "Trail Club");

        let delete = app.call("DELETE", &uri, Some("u1"), None).await;
        assert_eq!(delete.status(), StatusCode::OK);
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn unchanged_edit_is_400_without_code() {
        let app = TestApp::new();
        let id = app.create("u1", "Run Club").await;

        let response = app
            .call(
                "PUT",
                &format!("/api/activities/{id}"),
                Some("u1"),
                Some(activity_body("Run Club")),
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to update activity");
        assert!(body.get("code").is_none());
    }

    #[tokio::test]
    async fn editing_unknown_activity_is_404() {
        let app = TestApp::new();

        let uri = format!("/api/activities/{}", ActivityId::generate());
        let response = app
            .call("PUT", &uri, Some("u1"), Some(activity_body("Run Club")))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn attend_toggles_membership() {
        let app = TestApp::new();
        let id = app.create("u1", "Run Club").await;
        let uri = format!("/api/activities/{id}/attend");

        let join = app.call("POST", &uri, Some("u2"), None).await;
        assert_eq!(join.status(), StatusCode::OK);
        assert_eq!(app.list().await[0]["attendees"].as_array().unwrap().len(), 2);

        let leave = app.call("POST", &uri, Some("u2"), None).await;
        assert_eq!(leave.status(), StatusCode::OK);
        assert_eq!(app.list().await[0]["attendees"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn host_attend_cancels() {
        let app = TestApp::new();
        let id = app.create("u1", "Run Club").await;

        let response = app
            .call("POST", &format!("/api/activities/{id}/attend"), Some("u1"), None)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(app.list().await[0]["isCancelled"], true);
    }

    #[tokio::test]
    async fn store_outage_is_500() {
        let app = TestApp::with_store(InMemoryActivityStore::new().offline());

        let response = app.call("GET", "/api/activities", None, None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Something went wrong");
    }
}
