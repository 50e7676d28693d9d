use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ExerciseRuntime, ExerciseState};
use crate::booking::{
    find_doctor, unavailable_slots, DocumentCandidate, DocumentVerdict, FieldUpdate, FormField,
    SubmitOutcome, TIME_SLOTS,
};
use crate::error::AppError;
use crate::evaluation::{cnp, Action};

/// Router builder exposing the session, catalog and booking form endpoints.
pub fn exercise_router(state: ExerciseState) -> Router {
    Router::new()
        .route("/api/v1/session/actions", post(record_handler))
        .route("/api/v1/session/score", get(score_handler))
        .route("/api/v1/session/hint", post(hint_handler))
        .route("/api/v1/session/finalize", post(finalize_handler))
        .route("/api/v1/session/result", get(result_handler))
        .route("/api/v1/session/reset", post(reset_handler))
        .route("/api/v1/cnp/validate", post(cnp_handler))
        .route("/api/v1/catalog/slots", get(slots_handler))
        .route("/api/v1/booking/fields", put(field_handler))
        .route("/api/v1/booking/blur", post(blur_handler))
        .route("/api/v1/booking/document", post(document_handler))
        .route("/api/v1/booking/submit", post(submit_handler))
        .route("/api/v1/booking/appointments", get(appointments_handler))
        .route(
            "/api/v1/booking/appointments/:appointment_id",
            delete(cancel_handler),
        )
        .with_state(state)
}

/// A picked file; `media_type` may be omitted and is then guessed from the name.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CnpRequest {
    cnp: String,
}

#[derive(Debug, Deserialize)]
struct SlotQuery {
    doctor: String,
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct BlurRequest {
    field: FormField,
}

fn with_runtime<F>(state: &ExerciseState, handle: F) -> Response
where
    F: FnOnce(&mut ExerciseRuntime) -> Response,
{
    match state.lock() {
        Some(mut runtime) => handle(&mut runtime),
        None => {
            let payload = json!({ "error": "exercise runtime unavailable" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn session_view(runtime: &ExerciseRuntime) -> serde_json::Value {
    json!({
        "score": runtime.session.current_score(),
        "state": runtime.session.state(),
        "entries": runtime.session.entries().len(),
    })
}

async fn record_handler(
    State(state): State<ExerciseState>,
    Json(action): Json<Action>,
) -> Response {
    with_runtime(&state, |runtime| {
        let recorded = runtime.session.record(action);
        let mut view = session_view(runtime);
        view["recorded"] = json!(recorded);
        (StatusCode::OK, Json(view)).into_response()
    })
}

async fn score_handler(State(state): State<ExerciseState>) -> Response {
    with_runtime(&state, |runtime| {
        (StatusCode::OK, Json(session_view(runtime))).into_response()
    })
}

async fn hint_handler(State(state): State<ExerciseState>) -> Response {
    with_runtime(&state, |runtime| {
        runtime.session.request_hint();
        (StatusCode::OK, Json(session_view(runtime))).into_response()
    })
}

async fn finalize_handler(State(state): State<ExerciseState>) -> Response {
    with_runtime(&state, |runtime| {
        let result = runtime.session.finalize();
        (StatusCode::OK, Json(result.clone())).into_response()
    })
}

async fn result_handler(State(state): State<ExerciseState>) -> Response {
    with_runtime(&state, |runtime| match runtime.session.result() {
        Some(result) => (StatusCode::OK, Json(result.clone())).into_response(),
        None => {
            let payload = json!({ "error": "session not finalized" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    })
}

async fn reset_handler(State(state): State<ExerciseState>) -> Response {
    with_runtime(&state, |runtime| {
        runtime.reset();
        (StatusCode::OK, Json(session_view(runtime))).into_response()
    })
}

async fn cnp_handler(Json(request): Json<CnpRequest>) -> Response {
    let valid = cnp::validate(&request.cnp);
    (
        StatusCode::OK,
        Json(json!({ "cnp": request.cnp, "valid": valid })),
    )
        .into_response()
}

async fn slots_handler(Query(query): Query<SlotQuery>) -> Response {
    let Some(doctor) = find_doctor(&query.doctor) else {
        let payload = json!({ "error": format!("unknown doctor '{}'", query.doctor) });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    let blocked = unavailable_slots(doctor.name, query.date);
    let slots: Vec<_> = TIME_SLOTS
        .iter()
        .map(|slot| json!({ "time": slot, "available": !blocked.contains(slot) }))
        .collect();
    let payload = json!({
        "doctor": doctor.name,
        "specialization": doctor.specialization,
        "date": query.date,
        "slots": slots,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

async fn field_handler(
    State(state): State<ExerciseState>,
    Json(update): Json<FieldUpdate>,
) -> Response {
    with_runtime(&state, |runtime| {
        runtime.booking.update_field(update);
        let draft = runtime.booking.draft();
        let payload = json!({
            "draft": draft,
            "document": draft.identity_document.as_ref().map(|doc| doc.file_name.clone()),
            "errors": runtime.booking.errors(today()),
        });
        (StatusCode::OK, Json(payload)).into_response()
    })
}

async fn blur_handler(
    State(state): State<ExerciseState>,
    Json(request): Json<BlurRequest>,
) -> Response {
    with_runtime(&state, |runtime| {
        runtime
            .booking
            .blur_field(&mut runtime.session, request.field);
        (StatusCode::OK, Json(session_view(runtime))).into_response()
    })
}

async fn document_handler(
    State(state): State<ExerciseState>,
    Json(upload): Json<DocumentUpload>,
) -> Response {
    let media_type = upload
        .media_type
        .filter(|value| !value.trim().is_empty())
        .or_else(|| (state.media_type_guess)(&upload.file_name))
        .unwrap_or_default();
    debug!(file_name = %upload.file_name, %media_type, "document picked");
    let candidate = DocumentCandidate::new(upload.file_name, upload.size_bytes, media_type);

    with_runtime(&state, |runtime| {
        let verdict = runtime
            .booking
            .pick_document(&mut runtime.session, candidate);
        let score = runtime.session.current_score();
        match verdict {
            DocumentVerdict::Valid => (
                StatusCode::OK,
                Json(json!({ "valid": true, "violations": [], "score": score })),
            )
                .into_response(),
            DocumentVerdict::Invalid(violations) => {
                let violations: Vec<_> = violations
                    .iter()
                    .map(|violation| {
                        json!({ "rule": violation.label(), "message": violation.message() })
                    })
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "valid": false, "violations": violations, "score": score })),
                )
                    .into_response()
            }
        }
    })
}

async fn submit_handler(State(state): State<ExerciseState>) -> Response {
    with_runtime(&state, |runtime| {
        match runtime.booking.submit(&mut runtime.session, today()) {
            Ok(outcome @ SubmitOutcome::Booked { .. }) => {
                (StatusCode::CREATED, Json(outcome)).into_response()
            }
            Ok(outcome @ SubmitOutcome::Rejected { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(outcome)).into_response()
            }
            Err(err) => AppError::from(err).into_response(),
        }
    })
}

async fn appointments_handler(State(state): State<ExerciseState>) -> Response {
    with_runtime(&state, |runtime| match runtime.booking.appointments() {
        Ok(appointments) => (StatusCode::OK, Json(appointments)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    })
}

async fn cancel_handler(
    State(state): State<ExerciseState>,
    Path(appointment_id): Path<String>,
) -> Response {
    with_runtime(&state, |runtime| match runtime.booking.cancel(&appointment_id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => {
            let payload = json!({ "error": format!("appointment '{appointment_id}' not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    })
}
