use crate::models::{
    Credentials, Entry, ListFilters, LoginResponse, NewEntry, Scope, ToggleSaveResponse,
};
use crate::session::Session;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Failure talking to the journal collaborator.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("journal api unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("journal api answered {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("journal api sent an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    msg: String,
}

/// HTTP client for the remote journal service.
///
/// Holds no credentials: every authenticated call takes the caller's
/// [`Session`] explicitly.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let request = self.http.post(self.url("/login")).json(credentials);
        let login: LoginResponse = decode(send(request).await?).await?;
        info!(username = %login.username, "logged in");
        Ok(login)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let request = self.http.post(self.url("/register")).json(credentials);
        send(request).await?;
        info!(username = %credentials.username, "registered");
        Ok(())
    }

    pub async fn list_entries(
        &self,
        session: Option<&Session>,
        scope: Scope,
        filters: &ListFilters,
    ) -> Result<Vec<Entry>, ClientError> {
        let mut query: Vec<(&str, &str)> = vec![("mode", scope.as_mode())];
        if let Some(text) = filters.search_text.as_deref().filter(|t| !t.is_empty()) {
            query.push(("q", text));
        }
        if let Some(bucket) = filters.mood_bucket {
            query.push(("mood", bucket.as_str()));
        }

        let mut request = self.http.get(self.url("/dreams")).query(&query);
        if let Some(session) = session {
            request = request.bearer_auth(&session.token);
        }
        let entries: Vec<Entry> = decode(send(request).await?).await?;
        debug!(mode = scope.as_mode(), count = entries.len(), "listed entries");
        Ok(entries)
    }

    pub async fn create_entry(&self, session: &Session, entry: &NewEntry) -> Result<Entry, ClientError> {
        let request = self
            .http
            .post(self.url("/dreams"))
            .bearer_auth(&session.token)
            .json(entry);
        let created: Entry = decode(send(request).await?).await?;
        info!(id = created.id, username = %session.username, "created entry");
        Ok(created)
    }

    pub async fn delete_entry(&self, session: &Session, id: i64) -> Result<(), ClientError> {
        let request = self
            .http
            .delete(self.url(&format!("/dreams/{id}")))
            .bearer_auth(&session.token);
        send(request).await?;
        info!(id, username = %session.username, "deleted entry");
        Ok(())
    }

    /// Flips the saved flag on the collaborator and returns the confirmed value.
    pub async fn toggle_save(&self, session: &Session, id: i64) -> Result<bool, ClientError> {
        let request = self
            .http
            .post(self.url(&format!("/dreams/{id}/save")))
            .bearer_auth(&session.token)
            .json(&serde_json::json!({}));
        let toggled: ToggleSaveResponse = decode(send(request).await?).await?;
        debug!(id, is_saved = toggled.is_saved, "toggled save");
        Ok(toggled.is_saved)
    }

    pub async fn clear_all_personal_entries(&self, session: &Session) -> Result<(), ClientError> {
        let request = self.http.delete(self.url("/dreams")).bearer_auth(&session.token);
        send(request).await?;
        info!(username = %session.username, "cleared personal entries");
        Ok(())
    }

    /// Creates `entries` one request at a time, each awaited before the next.
    ///
    /// Stops at the first failure; entries created before it stay created.
    pub async fn generate_entries(
        &self,
        session: &Session,
        entries: &[NewEntry],
    ) -> Result<usize, ClientError> {
        let mut created = 0;
        for entry in entries {
            if let Err(err) = self.create_entry(session, entry).await {
                warn!(created, "demo generation stopped: {err}");
                return Err(err);
            }
            created += 1;
        }
        Ok(created)
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(err) => err.msg,
        Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("no details").to_string(),
        Err(_) => body,
    };
    warn!(%status, "journal api request failed: {message}");
    Err(ClientError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

const DEMO_ENTRIES: [(&str, u8, &str); 6] = [
    ("I was flying over the sea at night and the water glowed.", 4, "Booked a trip to the coast."),
    ("Late for an exam in a building with no stairs.", 2, "Deadline at work this week."),
    ("A cat guided me through a maze of libraries.", 4, ""),
    ("Falling endlessly while someone called my name.", 1, "Slept badly after coffee."),
    ("Chased through a market, then the chaser turned into a cat.", 3, ""),
    ("Swimming in warm water with friends from school.", 5, "Met an old friend yesterday."),
];

/// Fixed demo set for bulk generation.
pub fn demo_entries() -> Vec<NewEntry> {
    DEMO_ENTRIES
        .iter()
        .map(|(content, mood_level, reality)| NewEntry {
            content: content.to_string(),
            mood_level: *mood_level,
            reality_context: (!reality.is_empty()).then(|| reality.to_string()),
            is_public: false,
            is_anonymous: false,
        })
        .collect()
}
