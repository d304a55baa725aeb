//! Page guard for routes that need a live session

use super::{SessionAction, use_session};
use crate::pages::LoginPage;
use crate::storage::browser_session;
use portal_core::{AuthGuard, LoginRoute};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RequireSessionProps {
    pub children: Children,
    /// Entry the cached user's `userAccess` list must contain
    #[prop_or_default]
    pub capability: Option<AttrValue>,
}

/// Shows the login form instead of `children` when logged out, and the
/// account status instead of `children` until the account is fully approved
#[function_component(RequireSession)]
pub fn require_session(props: &RequireSessionProps) -> Html {
    let session = use_session();
    let authenticated = session.as_ref().is_some_and(|s| s.authenticated);
    let expired_notice = session.as_ref().is_some_and(|s| s.expired_notice);

    if !authenticated {
        return html! {
            <div class="min-h-screen bg-gray-50 flex flex-col items-center justify-center">
                if expired_notice {
                    <p class="mb-4 text-amber-700">{"Your session has expired. Please log in again."}</p>
                }
                <LoginPage />
            </div>
        };
    }

    let guard = AuthGuard::new(browser_session());
    let route = guard.current_route();
    if route != LoginRoute::Granted {
        let on_logout = Callback::from(move |_| {
            if let Some(session) = &session {
                session.dispatch(SessionAction::Logout);
            }
        });
        return html! {
            <div class="min-h-screen bg-gray-50 flex flex-col items-center justify-center gap-4">
                <p class="max-w-md text-center text-gray-700">{ route.message() }</p>
                if let Some(destination) = route.destination() {
                    <a class="text-blue-600" href={destination}>{"Continue"}</a>
                }
                <button class="text-sm text-red-600" onclick={on_logout}>{"Log out"}</button>
            </div>
        };
    }

    if let Some(capability) = &props.capability {
        if !guard.has_access(capability) {
            return html! {
                <div class="p-10 text-center text-gray-600">
                    {"Your account does not have access to this section."}
                </div>
            };
        }
    }

    html! { <>{ props.children.clone() }</> }
}
