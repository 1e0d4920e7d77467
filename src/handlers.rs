use crate::analysis;
use crate::calendar::{self, CalendarDay, CalendarView};
use crate::client::{demo_entries, ClientError};
use crate::errors::AppError;
use crate::keywords;
use crate::models::{
    AnalyzedEntry, AuthForm, CalendarQuery, CalendarResponse, Credentials, DateQuery, EntryForm,
    JournalQuery, JournalResponse, LibraryQuery, ListFilters, MoodBucket, NewEntry, Notice,
    NoticeQuery, SaveStateResponse, Scope,
};
use crate::session::{expired_cookie, session_cookie, token_from_headers, HeldPersonal, Session};
use crate::state::AppState;
use crate::stats::mood_trend;
use crate::ui::{self, JournalPage, LibraryPage};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use tracing::{info, warn};

const API_CLOUD_LIMIT: usize = 50;

async fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    state.resolve(token_from_headers(headers)).await
}

fn login_required() -> Response {
    Redirect::to("/login?notice=login_required").into_response()
}

fn journal_redirect(notice: Notice) -> Response {
    Redirect::to(&format!("/journal?cached=1&notice={}", notice.as_str())).into_response()
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap, Query(query): Query<NoticeQuery>) -> Response {
    match current_session(&state, &headers).await {
        Some(_) => Redirect::to("/journal").into_response(),
        None => Html(ui::render_landing(query.notice)).into_response(),
    }
}

pub async fn login_page(Query(query): Query<NoticeQuery>) -> Html<String> {
    Html(ui::render_auth(false, query.notice))
}

pub async fn register_page(Query(query): Query<NoticeQuery>) -> Html<String> {
    Html(ui::render_auth(true, query.notice))
}

pub async fn login(State(state): State<AppState>, Form(form): Form<AuthForm>) -> Response {
    let credentials = Credentials {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    match state.api.login(&credentials).await {
        Ok(login) => {
            let session = state.open(login).await;
            (
                [(header::SET_COOKIE, session_cookie(&session.token))],
                Redirect::to("/journal"),
            )
                .into_response()
        }
        Err(err) => {
            warn!(username = %credentials.username, "login failed: {err}");
            Redirect::to("/login?notice=login_failed").into_response()
        }
    }
}

pub async fn register(State(state): State<AppState>, Form(form): Form<AuthForm>) -> Redirect {
    let credentials = Credentials {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    match state.api.register(&credentials).await {
        Ok(()) => Redirect::to("/login?notice=registered"),
        Err(err) => {
            warn!(username = %credentials.username, "registration failed: {err}");
            Redirect::to("/register?notice=register_failed")
        }
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session) = current_session(&state, &headers).await {
        state.close(&session).await;
        info!(username = %session.username, "logged out");
    }
    ([(header::SET_COOKIE, expired_cookie())], Redirect::to("/")).into_response()
}

pub async fn journal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<JournalQuery>,
) -> Response {
    let Some(session) = current_session(&state, &headers).await else {
        return login_required();
    };

    let filters = ListFilters {
        search_text: query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
        mood_bucket: query.mood.as_deref().and_then(MoodBucket::parse),
    };
    let use_held = query.cached == Some(1);

    let (held, fetch_notice) = match load_personal(&state, &session, filters, use_held).await {
        Ok(loaded) => loaded,
        Err(err) => {
            warn!(username = %session.username, "session rejected by journal api: {err}");
            state.close(&session).await;
            return (
                [(header::SET_COOKIE, expired_cookie())],
                login_required(),
            )
                .into_response();
        }
    };

    let today = CalendarDay::today();
    let selected = query.date.as_deref().and_then(CalendarDay::parse);
    let view = match (query.year, query.month) {
        (Some(year), Some(month)) => CalendarView::new(year, month),
        _ => CalendarView::containing(&selected.unwrap_or(today)),
    };

    Html(ui::render_journal(&JournalPage {
        session: &session,
        entries: &held.all,
        matching: &held.matching,
        filters: &held.filters,
        view,
        selected,
        today,
        notice: fetch_notice.or(query.notice),
    }))
    .into_response()
}

/// Returns the personal collection, from the held copy when `use_held` allows.
///
/// A failed fetch keeps the last held collection and reports
/// [`Notice::FetchFailed`]; only a rejected session is an error.
async fn load_personal(
    state: &AppState,
    session: &Session,
    filters: ListFilters,
    use_held: bool,
) -> Result<(HeldPersonal, Option<Notice>), ClientError> {
    if use_held {
        if let Some(held) = state.held_personal(session).await {
            return Ok((held, None));
        }
    }

    match fetch_personal(state, session, filters.clone()).await {
        Ok(held) => {
            state.replace_personal(session, held.clone()).await;
            Ok((held, None))
        }
        Err(err) if err.is_unauthorized() => Err(err),
        Err(err) => {
            warn!(username = %session.username, "keeping held entries: {err}");
            let held = state.held_personal(session).await.unwrap_or(HeldPersonal {
                filters,
                all: Vec::new(),
                matching: Vec::new(),
            });
            Ok((held, Some(Notice::FetchFailed)))
        }
    }
}

/// Fetches the full personal collection, plus the subset matching `filters`
/// when a search is active.
async fn fetch_personal(
    state: &AppState,
    session: &Session,
    filters: ListFilters,
) -> Result<HeldPersonal, ClientError> {
    let all = state
        .api
        .list_entries(Some(session), Scope::Personal, &ListFilters::default())
        .await?;
    if filters.is_empty() {
        return Ok(HeldPersonal::unfiltered(all));
    }
    let matching = state
        .api
        .list_entries(Some(session), Scope::Personal, &filters)
        .await?;
    Ok(HeldPersonal {
        filters,
        all,
        matching,
    })
}

/// Replaces the held personal collection after a mutation.
async fn refresh_personal(state: &AppState, session: &Session) {
    match fetch_personal(state, session, ListFilters::default()).await {
        Ok(held) => state.replace_personal(session, held).await,
        Err(err) => warn!(username = %session.username, "refresh after change failed: {err}"),
    }
}

pub fn validate_entry(form: EntryForm) -> Result<NewEntry, AppError> {
    let content = form.content.trim();
    if content.is_empty() {
        return Err(AppError::bad_request("content must not be empty"));
    }
    let mood_level: u8 = form
        .mood_level
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request("mood_level must be a number"))?;
    if !(1..=5).contains(&mood_level) {
        return Err(AppError::bad_request("mood_level must be between 1 and 5"));
    }

    let is_public = form.is_public.is_some();
    Ok(NewEntry {
        content: content.to_string(),
        mood_level,
        reality_context: form
            .reality_context
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        is_public,
        is_anonymous: is_public && form.is_anonymous.is_some(),
    })
}

pub async fn create_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<EntryForm>,
) -> Response {
    let Some(session) = current_session(&state, &headers).await else {
        return login_required();
    };
    let entry = match validate_entry(form) {
        Ok(entry) => entry,
        Err(err) => {
            warn!(username = %session.username, "rejected entry: {}", err.message);
            return journal_redirect(Notice::InvalidEntry);
        }
    };

    let notice = match state.api.create_entry(&session, &entry).await {
        Ok(_) => Notice::Saved,
        Err(err) => {
            warn!(username = %session.username, "create failed: {err}");
            return journal_redirect(Notice::CreateFailed);
        }
    };
    refresh_personal(&state, &session).await;
    journal_redirect(notice)
}

pub async fn delete_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let Some(session) = current_session(&state, &headers).await else {
        return login_required();
    };
    if let Err(err) = state.api.delete_entry(&session, id).await {
        warn!(id, username = %session.username, "delete failed: {err}");
        return journal_redirect(Notice::DeleteFailed);
    }
    refresh_personal(&state, &session).await;
    journal_redirect(Notice::Deleted)
}

pub async fn clear_entries(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session) = current_session(&state, &headers).await else {
        return login_required();
    };
    if let Err(err) = state.api.clear_all_personal_entries(&session).await {
        warn!(username = %session.username, "clear failed: {err}");
        return journal_redirect(Notice::ClearFailed);
    }
    refresh_personal(&state, &session).await;
    journal_redirect(Notice::Cleared)
}

pub async fn generate_demo(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session) = current_session(&state, &headers).await else {
        return login_required();
    };
    let result = state.api.generate_entries(&session, &demo_entries()).await;
    // partial runs still changed the collection
    refresh_personal(&state, &session).await;
    match result {
        Ok(created) => {
            info!(created, username = %session.username, "generated demo entries");
            journal_redirect(Notice::DemoGenerated)
        }
        Err(_) => journal_redirect(Notice::DemoFailed),
    }
}

pub async fn library(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LibraryQuery>,
) -> Response {
    let session = current_session(&state, &headers).await;
    let saved_only = query.saved == Some(1);
    if saved_only && session.is_none() {
        return login_required();
    }
    let scope = if saved_only { Scope::Saved } else { Scope::Public };

    let held = match &session {
        Some(session) => state
            .held_library(session)
            .await
            .filter(|held| held.scope == scope),
        None => None,
    };

    let (entries, fetch_notice) = match held {
        Some(held) if query.cached == Some(1) => (held.entries, None),
        held => match state
            .api
            .list_entries(session.as_ref(), scope, &ListFilters::default())
            .await
        {
            Ok(entries) => {
                if let Some(session) = &session {
                    state.replace_library(session, scope, entries.clone()).await;
                }
                (entries, None)
            }
            Err(err) => {
                warn!(mode = scope.as_mode(), "library fetch failed: {err}");
                let entries = held.map(|held| held.entries).unwrap_or_default();
                (entries, Some(Notice::FetchFailed))
            }
        },
    };

    Html(ui::render_library(&LibraryPage {
        session: session.as_ref(),
        entries: &entries,
        saved_only,
        notice: fetch_notice.or(query.notice),
    }))
    .into_response()
}

pub async fn toggle_save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<LibraryQuery>,
) -> Response {
    let Some(session) = current_session(&state, &headers).await else {
        return login_required();
    };
    let back = if query.saved == Some(1) { "&saved=1" } else { "" };

    match state.api.toggle_save(&session, id).await {
        Ok(saved) => {
            if state.patch_library(&session, id, saved).await.is_none() {
                info!(id, "toggled entry is no longer in the held library");
            }
            Redirect::to(&format!("/library?cached=1{back}")).into_response()
        }
        Err(err) => {
            warn!(id, username = %session.username, "toggle failed: {err}");
            Redirect::to(&format!("/library?cached=1{back}&notice=toggle_failed")).into_response()
        }
    }
}

pub async fn api_calendar(Query(query): Query<CalendarQuery>) -> Json<CalendarResponse> {
    let view = match (query.year, query.month) {
        (Some(year), Some(month)) => CalendarView::new(year, month),
        _ => CalendarView::containing(&CalendarDay::today()),
    };
    let (year, month) = view.displayed();
    Json(CalendarResponse {
        year,
        month,
        title: view.title(),
        cells: view.cells().to_vec(),
    })
}

pub async fn api_journal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DateQuery>,
) -> Result<Json<JournalResponse>, AppError> {
    let session = current_session(&state, &headers)
        .await
        .ok_or_else(|| AppError::unauthorized("login required"))?;
    let selected = match query.date.as_deref() {
        Some(raw) => Some(
            CalendarDay::parse(raw).ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))?,
        ),
        None => None,
    };

    let entries = state
        .api
        .list_entries(Some(&session), Scope::Personal, &ListFilters::default())
        .await?;
    state
        .replace_personal(&session, HeldPersonal::unfiltered(entries.clone()))
        .await;

    let keywords = keywords::cloud(&entries, API_CLOUD_LIMIT, 0.0, 1.0);
    let trend = mood_trend(&entries);
    let visible = match &selected {
        Some(day) => calendar::filter_by_day(&entries, day),
        None => entries,
    };

    Ok(Json(JournalResponse {
        entries: visible
            .into_iter()
            .map(|entry| AnalyzedEntry {
                analysis: analysis::parse(entry.analysis.as_deref()),
                entry,
            })
            .collect(),
        keywords,
        trend,
    }))
}

pub async fn api_toggle_save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<SaveStateResponse>, AppError> {
    let session = current_session(&state, &headers)
        .await
        .ok_or_else(|| AppError::unauthorized("login required"))?;

    let saved = state.api.toggle_save(&session, id).await?;
    state.patch_library(&session, id, saved).await;

    Ok(Json(SaveStateResponse { id, is_saved: saved }))
}
