use crate::catalog;
use crate::errors::AppError;
use crate::form::{FormAction, FormState, on_day};
use crate::models::{
    AddLabelRequest, CatalogKind, ChartsQuery, ChartsResponse, DateForm, IndexQuery, LabelForm,
    MoodEntry, NotesForm, Rating, RatingForm, StateResponse, SubmitResponse,
};
use crate::state::AppState;
use crate::stats::build_charts;
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{Html, Redirect},
};
use chrono::{Local, NaiveDate, Utc};
use tracing::debug;

pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Html<String> {
    let session = state.session.lock().await;
    Html(render_index(&session, &query, Local::now()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let session = state.session.lock().await;
    Json(StateResponse {
        entry_count: session.entries.len(),
        catalogs: session.catalogs.clone(),
        form: session.form.clone(),
    })
}

pub async fn get_entries(State(state): State<AppState>) -> Json<Vec<MoodEntry>> {
    let session = state.session.lock().await;
    Json(session.entries.clone())
}

pub async fn get_charts(
    State(state): State<AppState>,
    Query(query): Query<ChartsQuery>,
) -> Json<ChartsResponse> {
    let session = state.session.lock().await;
    Json(build_charts(&session.entries, query.period.unwrap_or_default()))
}

pub async fn update_draft(
    State(state): State<AppState>,
    Json(action): Json<FormAction>,
) -> Result<Json<FormState>, AppError> {
    let form = apply_action(&state, action).await?;
    Ok(Json(form))
}

pub async fn submit_entry(State(state): State<AppState>) -> Json<SubmitResponse> {
    Json(submit_draft(&state).await)
}

pub async fn get_catalog(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let kind = parse_kind(&kind)?;
    let session = state.session.lock().await;
    Ok(Json(session.catalogs.get(kind).to_vec()))
}

pub async fn add_catalog_label(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(payload): Json<AddLabelRequest>,
) -> Result<Json<Vec<String>>, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(add_label(&state, kind, &payload.label).await))
}

pub async fn form_date(
    State(state): State<AppState>,
    Form(payload): Form<DateForm>,
) -> Result<Redirect, AppError> {
    let day = NaiveDate::parse_from_str(payload.date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be YYYY-MM-DD"))?;
    let date = on_day(day, &Local::now())
        .ok_or_else(|| AppError::bad_request("date does not exist in the local timezone"))?;
    apply_action(&state, FormAction::SetDate { date }).await?;
    Ok(Redirect::to("/"))
}

pub async fn form_rating(
    State(state): State<AppState>,
    Form(payload): Form<RatingForm>,
) -> Result<Redirect, AppError> {
    let rating = Rating::clamped(payload.rating);
    apply_action(&state, FormAction::SetRating { rating }).await?;
    Ok(Redirect::to("/"))
}

pub async fn form_notes(
    State(state): State<AppState>,
    Form(payload): Form<NotesForm>,
) -> Result<Redirect, AppError> {
    apply_action(&state, FormAction::SetNotes { notes: payload.notes }).await?;
    Ok(Redirect::to("/"))
}

pub async fn form_toggle(
    State(state): State<AppState>,
    Form(payload): Form<LabelForm>,
) -> Result<Redirect, AppError> {
    let kind = parse_kind(&payload.kind)?;
    apply_action(
        &state,
        FormAction::Toggle {
            kind,
            label: payload.label,
        },
    )
    .await?;
    Ok(Redirect::to("/"))
}

pub async fn form_submit(State(state): State<AppState>) -> Redirect {
    submit_draft(&state).await;
    Redirect::to("/?saved=1")
}

pub async fn form_add_label(
    State(state): State<AppState>,
    Form(payload): Form<LabelForm>,
) -> Result<Redirect, AppError> {
    let kind = parse_kind(&payload.kind)?;
    add_label(&state, kind, &payload.label).await;
    Ok(Redirect::to("/"))
}

async fn apply_action(state: &AppState, action: FormAction) -> Result<FormState, AppError> {
    let mut session = state.session.lock().await;
    if let FormAction::Toggle { kind, label } = &action {
        if !session.catalogs.contains(*kind, label) {
            return Err(AppError::bad_request(format!(
                "'{label}' is not in the {} catalog",
                kind.slug()
            )));
        }
    }

    debug!(?action, "applying form action");
    session.form = session.form.clone().reduce(action);
    Ok(session.form.clone())
}

async fn submit_draft(state: &AppState) -> SubmitResponse {
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let (entries, entry) = session
        .form
        .submit(state.store.as_ref(), &session.entries, Utc::now())
        .await;
    session.entries = entries;
    SubmitResponse {
        entry,
        total: session.entries.len(),
    }
}

async fn add_label(state: &AppState, kind: CatalogKind, label: &str) -> Vec<String> {
    let mut session = state.session.lock().await;
    let next = catalog::add(state.store.as_ref(), kind, session.catalogs.get(kind), label).await;
    session.catalogs.replace(kind, next.clone());
    next
}

fn parse_kind(raw: &str) -> Result<CatalogKind, AppError> {
    CatalogKind::parse(raw).ok_or_else(|| AppError::not_found(format!("unknown catalog '{raw}'")))
}
