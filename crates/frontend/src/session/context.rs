//! Session context shared by every page

use crate::client::portal_client;
use crate::config::FrontendConfig;
use crate::storage::browser_session;
use gloo::timers::callback::Interval;
use portal_core::views::ProfileController;
use portal_core::{AuthGuard, Clock, KeyValueStorage, RemainingTime, SessionStore, UserRecord};
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// What the UI knows about the stored session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionContextData {
    pub authenticated: bool,
    pub user: Option<UserRecord>,
    pub remaining: RemainingTime,
    /// Set when a periodic check found the session expired
    pub expired_notice: bool,
}

impl SessionContextData {
    /// Snapshot `session` as it is now
    pub fn read<S: KeyValueStorage, C: Clock>(
        session: &SessionStore<S, C>,
        expired_notice: bool,
    ) -> Self {
        let authenticated = session.is_authenticated();
        Self {
            authenticated,
            user: authenticated.then(|| session.user()).flatten(),
            remaining: session.remaining_time(),
            expired_notice,
        }
    }

    /// Apply `action` to `session` and snapshot the result
    pub fn apply<S: KeyValueStorage, C: Clock>(
        &self,
        session: &SessionStore<S, C>,
        action: SessionAction,
    ) -> Self {
        match action {
            SessionAction::Refresh => Self::read(session, false),
            SessionAction::Validate => {
                let still_valid = session.validate();
                Self::read(session, self.authenticated && !still_valid)
            }
            SessionAction::Extend => {
                session.extend();
                Self::read(session, false)
            }
            SessionAction::Logout => {
                session.clear();
                info!("Logged out");
                Self::read(session, false)
            }
        }
    }
}

/// Session context actions
pub enum SessionAction {
    /// Re-read storage after a login or a failed call
    Refresh,
    /// Drop the session if it has expired
    Validate,
    /// Push the expiration out by another full duration
    Extend,
    Logout,
}

/// Session context
pub type SessionContext = UseReducerHandle<SessionContextData>;

impl Reducible for SessionContextData {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(&browser_session(), action))
    }
}

/// Session provider props
#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

/// Session provider component
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let session = use_reducer(|| SessionContextData::read(&browser_session(), false));

    // Discard a session that expired while the tab was closed
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            session.dispatch(SessionAction::Validate);
        });
    }

    // Re-check periodically while logged in
    {
        let session_handle = session.clone();
        use_effect_with(session.authenticated, move |authenticated| {
            let interval = authenticated.then(|| {
                Interval::new(FrontendConfig::SESSION_CHECK_INTERVAL_MS, move || {
                    session_handle.dispatch(SessionAction::Validate);
                })
            });
            move || drop(interval)
        });
    }

    // Pick up account changes made since the session was saved
    {
        let session_handle = session.clone();
        use_effect_with(session.authenticated, move |authenticated| {
            if *authenticated {
                spawn_local(async move {
                    refresh_profile().await;
                    session_handle.dispatch(SessionAction::Refresh);
                });
            }
        });
    }

    html! {
        <ContextProvider<SessionContext> context={session}>
            {props.children.clone()}
        </ContextProvider<SessionContext>>
    }
}

/// Merge the backend profile over the cached user
async fn refresh_profile() {
    let store = browser_session();
    let client = match portal_client(AuthGuard::new(browser_session()).auth_headers()) {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, "Failed to build backend client");
            return;
        }
    };

    let mut controller = ProfileController::new();
    controller.load(&client, &store).await;
    if let Some(err) = &controller.state.error {
        warn!(error = %err, "Could not refresh profile");
    }
}

/// Hook to use the session context, `None` outside a [`SessionProvider`]
#[hook]
pub fn use_session() -> Option<SessionContext> {
    use_context::<SessionContext>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use portal_core::{ManualClock, MemoryStorage};
    use std::sync::Arc;

    fn fixture() -> (SessionStore<Arc<MemoryStorage>, Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        ));
        let session = SessionStore::with_clock(Arc::new(MemoryStorage::new()), clock.clone());
        (session, clock)
    }

    #[test]
    fn snapshot_reflects_storage() {
        let (session, _) = fixture();
        let empty = SessionContextData::read(&session, false);
        assert!(!empty.authenticated);
        assert!(empty.user.is_none());
        assert!(empty.remaining.expired);

        session.save("tok", &UserRecord::default());
        let state = empty.apply(&session, SessionAction::Refresh);
        assert!(state.authenticated);
        assert_eq!(state.user, Some(UserRecord::default()));
        assert_eq!(state.remaining.days, 20);
    }

    #[test]
    fn validate_flags_expiry_once() {
        let (session, clock) = fixture();
        session.save("tok", &UserRecord::default());
        let state = SessionContextData::read(&session, false);

        clock.advance(TimeDelta::days(21));
        let state = state.apply(&session, SessionAction::Validate);
        assert!(!state.authenticated);
        assert!(state.expired_notice);
        assert!(session.token().is_none());

        let state = state.apply(&session, SessionAction::Validate);
        assert!(!state.expired_notice);
    }

    #[test]
    fn extend_and_logout() {
        let (session, clock) = fixture();
        session.save("tok", &UserRecord::default());
        clock.advance(TimeDelta::days(5));

        let state = SessionContextData::read(&session, false);
        assert_eq!(state.remaining.days, 15);
        let state = state.apply(&session, SessionAction::Extend);
        assert_eq!(state.remaining.days, 20);

        let state = state.apply(&session, SessionAction::Logout);
        assert!(!state.authenticated);
        assert!(session.token().is_none());
    }
}
