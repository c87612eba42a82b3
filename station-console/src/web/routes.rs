//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::domain::{Station, StationId};
use crate::filter::derive_view;
use crate::form::{FormError, StationForm};
use crate::repository::RepositoryError;
use crate::shell::{Shell, View};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(list_stations))
        .route("/health", get(health))
        .route("/map", get(map_page))
        .route("/stations", get(list_stations).post(create_station))
        .route("/stations/new", get(new_station_page))
        .route("/stations/:id", post(update_station))
        .route("/stations/:id/edit", get(edit_station_page))
        .route("/stations/:id/delete", post(delete_station))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Take the notices queued since the last rendered page.
fn take_notices(state: &AppState) -> Vec<NoticeView> {
    NoticeView::from_notices(state.store.notifier().drain())
}

/// Station list with filters; JSON unless the client asks for HTML.
async fn list_stations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let filter = query.to_filter();
    let loaded = state.store.stations().await;
    let stations = derive_view(loaded.stations_or_empty(), &filter);

    if accepts_html(&headers) {
        let mut shell = Shell::new();
        shell.show(View::List);

        let template = StationsTemplate {
            nav: NavView::from_shell(&shell),
            notices: take_notices(&state),
            load_failed: loaded.is_error(),
            stations: stations.iter().map(StationView::from_station).collect(),
            search: filter.search_term.clone(),
            status_options: status_filter_options(&filter),
            connector_options: connector_filter_options(&filter),
        };
        Ok(render(&template)?.into_response())
    } else if let Some(error) = &loaded.error {
        let body = Json(ErrorResponse {
            error: error.to_string(),
        });
        Ok((StatusCode::BAD_GATEWAY, body).into_response())
    } else {
        Ok(Json(StationListResponse::new(stations)).into_response())
    }
}

/// Placeholder map with a details panel for `?selected=<id>`.
async fn map_page(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Response, AppError> {
    let loaded = state.store.stations().await;
    let stations = loaded.stations_or_empty();

    let selected = query
        .selected_id()
        .and_then(|id| stations.iter().find(|s| s.id == id))
        .map(StationView::from_station);

    let mut shell = Shell::new();
    shell.show(View::Map);

    let template = MapTemplate {
        nav: NavView::from_shell(&shell),
        notices: take_notices(&state),
        load_failed: loaded.is_error(),
        stations: stations.iter().map(StationView::from_station).collect(),
        selected,
    };
    Ok(render(&template)?.into_response())
}

/// Blank form.
async fn new_station_page(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut shell = Shell::new();
    shell.add_new();
    form_page(&state, &shell, &StationForm::initialize(None), StatusCode::OK)
}

/// Form seeded from the cached station.
async fn edit_station_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let station = find_station(&state, StationId::new(id)).await?;

    let mut shell = Shell::new();
    shell.edit(station);
    let form = StationForm::initialize(shell.editing());
    form_page(&state, &shell, &form, StatusCode::OK)
}

async fn create_station(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let mut shell = Shell::new();
    shell.add_new();
    submit_form(&state, shell, StationForm::initialize(None), &fields).await
}

/// Update from the posted fields.
///
/// The cached row seeds the draft when there is one. Without it the posted
/// fields stand alone and the repository decides whether the station exists.
async fn update_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let id = StationId::new(id);
    let mut shell = Shell::new();
    let form = match state.store.find(&id).await {
        Some(station) => {
            let form = StationForm::initialize(Some(&station));
            shell.edit(station);
            form
        }
        None => {
            tracing::debug!(%id, "station not in cached collection, updating from posted fields");
            shell.show(View::Form);
            StationForm::editing(id)
        }
    };
    submit_form(&state, shell, form, &fields).await
}

/// Delete and return to the list, where the outcome notice is shown.
async fn delete_station(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let id = StationId::new(id);
    if state.store.delete(&id).await.is_err() {
        tracing::debug!(%id, "delete failed, returning to list");
    }
    Redirect::to(View::List.path())
}

/// Apply the posted fields to a draft and submit it.
///
/// Success closes the form and redirects to the list. A failed write
/// re-renders the form with the posted draft so it can be resubmitted.
async fn submit_form(
    state: &AppState,
    mut shell: Shell,
    mut form: StationForm,
    fields: &[(String, String)],
) -> Result<Response, AppError> {
    for (name, value) in fields {
        form.set_named(name, value)?;
    }

    match form.submit(state.store.as_ref()).await {
        Ok(_) => Ok(Redirect::to(shell.close_form().path()).into_response()),
        Err(FormError::Mutation(e)) => {
            let status = match e.source {
                RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            };
            form_page(state, &shell, &form, status)
        }
        Err(e) => Err(e.into()),
    }
}

fn form_page(
    state: &AppState,
    shell: &Shell,
    form: &StationForm,
    status: StatusCode,
) -> Result<Response, AppError> {
    let template = FormTemplate::from_form(form, NavView::from_shell(shell), take_notices(state));
    Ok((status, render(&template)?).into_response())
}

async fn find_station(state: &AppState, id: StationId) -> Result<Station, AppError> {
    state
        .store
        .find(&id)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Station {} not found", id),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::UnknownField(_) | FormError::InvalidStatus(_) | FormError::Busy => {
                AppError::BadRequest {
                    message: e.to_string(),
                }
            }
            FormError::Mutation(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message, details) = match self {
            AppError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "Bad Request", message, None)
            }
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "Not Found", message, None),
            AppError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "The request could not be completed.".to_string(),
                Some(message),
            ),
        };

        if status.is_server_error() {
            tracing::error!(%status, details = ?details, "{message}");
        } else {
            tracing::warn!(%status, "{message}");
        }

        let page = ErrorTemplate {
            nav: NavView::default(),
            notices: Vec::new(),
            title: title.to_string(),
            message,
            details,
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                let body = Json(ErrorResponse {
                    error: format!("Template error: {}", e),
                });
                (status, body).into_response()
            }
        }
    }
}
