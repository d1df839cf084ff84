use std::cell::{Cell, RefCell};

use crate::api::BookingApi;
use crate::error::ApiError;
use crate::models::{CurrentUser, Role};

use super::claims::{decode_claims, Claims};
use super::clock::Clock;
use super::storage::TokenStorage;

/// Something the UI should tell the user about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// The account was suspended by an administrator.
    Suspended,
    /// The token expired while the app was open.
    Expired,
    EmailNotVerified,
    LoginFailed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<CurrentUser>,
    pub claims: Option<Claims>,
    /// True only while the profile round-trip of `load` is in flight.
    pub loading: bool,
    pub notice: Option<SessionNotice>,
}

impl SessionState {
    fn logged_out(notice: Option<SessionNotice>) -> Self {
        Self {
            notice,
            ..Self::default()
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|role| role.is_admin())
    }
}

/// Argument of [`SessionStore::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    User(CurrentUser),
    LoggedOut,
    /// Re-run `load`, trusting the server rather than local token fields.
    Reload,
}

type Subscriber = Box<dyn Fn(&SessionState)>;

/// Single source of truth for the current session.
///
/// Never returns an error for a bad or missing token: every such case ends
/// in the logged out state with the token removed from storage.
pub struct SessionStore<S, A, C> {
    storage: S,
    api: A,
    clock: C,
    state: RefCell<SessionState>,
    generation: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber>>,
}

enum LoadFailure {
    Suspended,
    Api(ApiError),
}

impl<S, A, C> SessionStore<S, A, C>
where
    S: TokenStorage,
    A: BookingApi,
    C: Clock,
{
    pub fn new(storage: S, api: A, clock: C) -> Self {
        Self {
            storage,
            api,
            clock,
            // nothing has been checked yet, so treat the first render as loading
            state: RefCell::new(SessionState {
                loading: true,
                ..SessionState::default()
            }),
            generation: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&SessionState) + 'static,
    {
        self.subscribers.borrow_mut().push(Box::new(callback));
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// True iff a token is stored, decodes, and has not expired.
    pub fn is_authenticated(&self) -> bool {
        self.storage
            .read()
            .and_then(|token| decode_claims(&token).ok())
            .is_some_and(|claims| !claims.is_expired_at(self.clock.now()))
    }

    /// The stored token when it is still usable for authenticated calls.
    pub fn token(&self) -> Option<String> {
        self.is_authenticated().then(|| self.storage.read()).flatten()
    }

    fn next_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    fn replace(&self, state: SessionState) {
        *self.state.borrow_mut() = state;
        let snapshot = self.state();
        for callback in self.subscribers.borrow().iter() {
            callback(&snapshot);
        }
    }

    /// Stored token and its claims, removing the token if it is unusable.
    fn usable_token(&self) -> Option<(String, Claims)> {
        let token = self.storage.read()?;
        match decode_claims(&token) {
            Ok(claims) if !claims.is_expired_at(self.clock.now()) => Some((token, claims)),
            Ok(claims) => {
                tracing::info!(exp = claims.exp, "stored token has expired");
                self.storage.remove();
                None
            }
            Err(err) => {
                tracing::warn!(%err, "discarding undecodable token");
                self.storage.remove();
                None
            }
        }
    }

    async fn fetch_user(&self, token: &str) -> Result<CurrentUser, LoadFailure> {
        let status = self
            .api
            .account_status(token)
            .await
            .map_err(LoadFailure::Api)?;
        if status.suspended {
            return Err(LoadFailure::Suspended);
        }
        self.api.profile(token).await.map_err(LoadFailure::Api)
    }

    /// Derives the session from the stored token and the profile endpoint.
    pub async fn load(&self) {
        let generation = self.next_generation();

        let Some((token, claims)) = self.usable_token() else {
            self.replace(SessionState::logged_out(None));
            return;
        };

        self.replace(SessionState {
            loading: true,
            claims: Some(claims.clone()),
            ..SessionState::default()
        });

        let result = self.fetch_user(&token).await;

        if generation != self.generation.get() {
            tracing::debug!(generation, "discarding superseded session load");
            return;
        }

        match result {
            Ok(user) => {
                tracing::info!(email = %user.email, role = %user.role, "session loaded");
                self.replace(SessionState {
                    user: Some(user),
                    claims: Some(claims),
                    loading: false,
                    notice: None,
                });
            }
            Err(LoadFailure::Suspended) => {
                tracing::info!("account is suspended, ending session");
                self.storage.remove();
                self.replace(SessionState::logged_out(Some(SessionNotice::Suspended)));
            }
            Err(LoadFailure::Api(err)) => {
                tracing::warn!(%err, "profile fetch failed, ending session");
                self.storage.remove();
                self.replace(SessionState::logged_out(None));
            }
        }
    }

    pub async fn set(&self, update: SessionUpdate) {
        match update {
            SessionUpdate::User(user) => {
                self.next_generation();
                let claims = self.state.borrow().claims.clone();
                self.replace(SessionState {
                    user: Some(user),
                    claims,
                    loading: false,
                    notice: None,
                });
            }
            SessionUpdate::LoggedOut => {
                self.next_generation();
                tracing::info!("logged out");
                self.storage.remove();
                self.replace(SessionState::logged_out(None));
            }
            SessionUpdate::Reload => self.load().await,
        }
    }

    /// Periodic re-validation of `exp`. Returns true when the session was
    /// ended by this call.
    pub fn check_expiry(&self) -> bool {
        // a user set without a stored token has nothing to expire
        if self.storage.read().is_none() || self.usable_token().is_some() {
            return false;
        }
        self.next_generation();
        tracing::info!("session expired");
        self.replace(SessionState::logged_out(Some(SessionNotice::Expired)));
        true
    }

    /// Logs in, stores the token and reloads the profile from the server.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        match self.api.login(email, password).await {
            Ok(token) => {
                self.storage.write(&token);
                self.set(SessionUpdate::Reload).await;
                Ok(())
            }
            Err(err) => {
                let notice = match &err {
                    ApiError::EmailNotVerified => SessionNotice::EmailNotVerified,
                    other => SessionNotice::LoginFailed(other.to_string()),
                };
                let mut state = self.state();
                state.notice = Some(notice);
                self.replace(state);
                Err(err)
            }
        }
    }
}
