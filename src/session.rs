use crate::models::{Entry, ListFilters, Scope};
use axum::http::{header, HeaderMap};

pub const COOKIE_NAME: &str = "dream_log_session";

/// The caller's identity, resolved per request and passed explicitly to
/// every authenticated collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
}

/// Collections a logged-in user's views currently hold.
#[derive(Debug, Default)]
pub struct SessionViews {
    pub username: String,
    pub personal: Option<HeldPersonal>,
    pub library: Option<HeldLibrary>,
}

#[derive(Debug, Clone)]
pub struct HeldPersonal {
    pub filters: ListFilters,
    /// Every personal entry, regardless of the active search.
    pub all: Vec<Entry>,
    /// The subset the active search matched; equal to `all` without filters.
    pub matching: Vec<Entry>,
}

impl HeldPersonal {
    pub fn unfiltered(entries: Vec<Entry>) -> Self {
        Self {
            filters: ListFilters::default(),
            matching: entries.clone(),
            all: entries,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeldLibrary {
    pub scope: Scope,
    pub entries: Vec<Entry>,
}

pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str) -> String {
    format!("{COOKIE_NAME}={token}; HttpOnly; Path=/; SameSite=Lax")
}

pub fn expired_cookie() -> String {
    format!("{COOKIE_NAME}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}
