use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{BookingApi, HttpBookingApi};
use crate::config::ClientConfig;
use crate::models::{CurrentUser, Role};
use crate::session::{
    BrowserTokenStorage, Clock, SessionNotice, SessionStore, SessionUpdate, SystemClock,
    TokenStorage,
};

/// Requests the provider runs against the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Reload,
    Logout,
    SetUser(CurrentUser),
    Login { email: String, password: String },
}

type BrowserSessionStore = SessionStore<BrowserTokenStorage, HttpBookingApi, SystemClock>;

/// Reactive view of the session, provided by [`SessionProvider`].
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub user: RwSignal<Option<CurrentUser>>,
    pub loading: RwSignal<bool>,
    pub notice: RwSignal<Option<SessionNotice>>,
    /// Bearer token for authenticated calls, if any.
    pub token: RwSignal<Option<String>>,
    store: StoredValue<Option<Rc<BrowserSessionStore>>, LocalStorage>,
}

impl SessionContext {
    fn new() -> Self {
        Self {
            user: RwSignal::new(None),
            loading: RwSignal::new(true),
            notice: RwSignal::new(None),
            token: RwSignal::new(None),
            store: StoredValue::new_local(None),
        }
    }

    /// Runs `command` on its own task; commands sent back to back are all
    /// applied, in order.
    pub fn send(&self, command: SessionCommand) {
        let Some(store) = self.store.try_get_value().flatten() else {
            leptos::logging::warn!("session command sent before the provider was ready");
            return;
        };
        spawn_local(async move { run_command(&store, command).await });
    }

    pub fn set_user(&self, user: CurrentUser) {
        self.send(SessionCommand::SetUser(user));
    }

    pub fn logout(&self) {
        self.send(SessionCommand::Logout);
    }

    pub fn reload(&self) {
        self.send(SessionCommand::Reload);
    }

    pub fn login(&self, email: String, password: String) {
        self.send(SessionCommand::Login { email, password });
    }

    pub fn role(&self) -> Option<Role> {
        self.user.with(|user| user.as_ref().map(|u| u.role))
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|role| role.is_admin())
    }
}

pub(crate) async fn run_command<S, A, C>(store: &SessionStore<S, A, C>, command: SessionCommand)
where
    S: TokenStorage,
    A: BookingApi,
    C: Clock,
{
    match command {
        SessionCommand::Reload => store.set(SessionUpdate::Reload).await,
        SessionCommand::Logout => store.set(SessionUpdate::LoggedOut).await,
        SessionCommand::SetUser(user) => store.set(SessionUpdate::User(user)).await,
        SessionCommand::Login { email, password } => {
            if let Err(e) = store.login(&email, &password).await {
                leptos::logging::error!("Login failed: {}", e);
            }
        }
    }
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

pub fn use_client_config() -> ClientConfig {
    use_context::<ClientConfig>().unwrap_or_default()
}

#[component]
pub fn SessionProvider(children: Children) -> impl IntoView {
    let config = use_client_config();
    let storage = BrowserTokenStorage::new(config.token_storage_key.clone());
    let store = Rc::new(SessionStore::new(
        storage.clone(),
        HttpBookingApi::new(&config),
        SystemClock,
    ));

    let context = SessionContext::new();
    context.store.set_value(Some(store.clone()));
    provide_context(context);

    store.subscribe(move |state| {
        context.user.set(state.user.clone());
        context.loading.set(state.loading);
        context.notice.set(state.notice.clone());
        context.token.set(storage.read());
    });

    Effect::new({
        let store = store.clone();
        move |_| {
            let store = store.clone();
            spawn_local(async move { store.load().await });
        }
    });

    #[cfg(feature = "hydrate")]
    {
        let store = store.clone();
        match set_interval_with_handle(
            move || {
                store.check_expiry();
            },
            config.session_check_interval,
        ) {
            Ok(handle) => on_cleanup(move || handle.clear()),
            Err(e) => leptos::logging::error!("Failed to start session expiry timer: {:?}", e),
        }
    }

    children()
}
