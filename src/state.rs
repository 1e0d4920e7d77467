use crate::client::ApiClient;
use crate::models::{Entry, LoginResponse, Scope};
use crate::session::{HeldLibrary, HeldPersonal, Session, SessionViews};
use crate::toggle::apply_toggle_result;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub sessions: Arc<Mutex<HashMap<String, SessionViews>>>,
}

impl AppState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn resolve(&self, token: Option<String>) -> Option<Session> {
        let token = token?;
        let sessions = self.sessions.lock().await;
        sessions.get(&token).map(|views| Session {
            username: views.username.clone(),
            token,
        })
    }

    /// Starts a session for `login`, ending any earlier session of the same user.
    pub async fn open(&self, login: LoginResponse) -> Session {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, views| views.username != login.username);
        if sessions.len() < before {
            debug!(username = %login.username, "replaced earlier session");
        }
        sessions.insert(
            login.access_token.clone(),
            SessionViews {
                username: login.username.clone(),
                ..SessionViews::default()
            },
        );
        Session {
            token: login.access_token,
            username: login.username,
        }
    }

    pub async fn close(&self, session: &Session) {
        self.sessions.lock().await.remove(&session.token);
    }

    pub async fn held_personal(&self, session: &Session) -> Option<HeldPersonal> {
        let sessions = self.sessions.lock().await;
        sessions.get(&session.token)?.personal.clone()
    }

    pub async fn replace_personal(&self, session: &Session, held: HeldPersonal) {
        let mut sessions = self.sessions.lock().await;
        if let Some(views) = sessions.get_mut(&session.token) {
            views.personal = Some(held);
        }
    }

    pub async fn held_library(&self, session: &Session) -> Option<HeldLibrary> {
        let sessions = self.sessions.lock().await;
        sessions.get(&session.token)?.library.clone()
    }

    pub async fn replace_library(&self, session: &Session, scope: Scope, entries: Vec<Entry>) {
        let mut sessions = self.sessions.lock().await;
        if let Some(views) = sessions.get_mut(&session.token) {
            views.library = Some(HeldLibrary { scope, entries });
        }
    }

    /// Applies a confirmed saved state to the held library collection.
    ///
    /// Returns the patched entry, or `None` when the entry is no longer held.
    pub async fn patch_library(&self, session: &Session, id: i64, saved: bool) -> Option<Entry> {
        let mut sessions = self.sessions.lock().await;
        let library = sessions.get_mut(&session.token)?.library.as_mut()?;
        library.entries = apply_toggle_result(&library.entries, id, saved);
        library.entries.iter().find(|entry| entry.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(ApiClient::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap())
    }

    fn login(token: &str, username: &str) -> LoginResponse {
        LoginResponse {
            access_token: token.to_string(),
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn logging_in_again_replaces_the_old_session() {
        let state = state();
        let first = state.open(login("tok-1", "mira")).await;
        state.replace_personal(&first, HeldPersonal::unfiltered(Vec::new())).await;
        state.open(login("tok-x", "noa")).await;

        let second = state.open(login("tok-2", "mira")).await;
        assert_eq!(state.sessions.lock().await.len(), 2);
        assert_eq!(state.resolve(Some("tok-1".to_string())).await, None);
        assert_eq!(state.resolve(Some("tok-2".to_string())).await, Some(second.clone()));
        assert!(state.held_personal(&second).await.is_none());
        assert!(state.resolve(Some("tok-x".to_string())).await.is_some());
    }

    #[tokio::test]
    async fn close_forgets_held_collections() {
        let state = state();
        let session = state.open(login("tok-1", "mira")).await;
        state.replace_library(&session, Scope::Public, Vec::new()).await;
        state.close(&session).await;
        assert!(state.sessions.lock().await.is_empty());
        assert!(state.held_library(&session).await.is_none());
    }
}
