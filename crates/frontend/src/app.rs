//! Application shell

use crate::config::FrontendConfig;
use crate::pages::{ApplicationsPage, CommissionPage, PlansPage};
use crate::session::{RequireSession, SessionAction, SessionProvider, use_session};
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Plans,
    Applications,
    Commission,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Plans, Tab::Applications, Tab::Commission];

    fn label(self) -> &'static str {
        match self {
            Tab::Plans => "Insurance plans",
            Tab::Applications => "Applications",
            Tab::Commission => "Commission",
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <SessionProvider>
            <RequireSession>
                <Shell />
            </RequireSession>
        </SessionProvider>
    }
}

#[function_component(Shell)]
fn shell() -> Html {
    let session = use_session();
    let tab = use_state(|| Tab::Plans);

    let on_logout = {
        let session = session.clone();
        Callback::from(move |_| {
            if let Some(session) = &session {
                session.dispatch(SessionAction::Logout);
            }
        })
    };

    let on_extend = {
        let session = session.clone();
        Callback::from(move |_| {
            if let Some(session) = &session {
                session.dispatch(SessionAction::Extend);
            }
        })
    };

    let remaining = session
        .as_ref()
        .map(|s| s.remaining)
        .unwrap_or_default();
    let email = session
        .as_ref()
        .and_then(|s| s.user.as_ref())
        .and_then(|user| user.email.clone())
        .unwrap_or_default();

    let page = match *tab {
        Tab::Plans => html! { <PlansPage /> },
        Tab::Applications => html! { <ApplicationsPage /> },
        Tab::Commission => html! { <CommissionPage /> },
    };
    let insurance_only = !matches!(*tab, Tab::Commission);

    html! {
        <div class="min-h-screen bg-gray-50">
            <header class="flex items-center justify-between bg-white px-6 py-4 shadow">
                <nav class="flex gap-4">
                    { for Tab::ALL.into_iter().map(|item| {
                        let tab = tab.clone();
                        let class = if *tab == item { "font-semibold text-blue-600" } else { "text-gray-600" };
                        html! {
                            <button {class} onclick={Callback::from(move |_| tab.set(item))}>
                                { item.label() }
                            </button>
                        }
                    }) }
                </nav>
                <div class="flex items-center gap-4 text-sm text-gray-600">
                    <span>{ email }</span>
                    <span>
                        { format!("Session: {}d {}h {}m", remaining.days, remaining.hours, remaining.minutes) }
                    </span>
                    <button class="text-blue-600" onclick={on_extend}>{"Stay signed in"}</button>
                    <button class="text-red-600" onclick={on_logout}>{"Log out"}</button>
                </div>
            </header>
            if insurance_only {
                <RequireSession capability={FrontendConfig::INSURANCE_CAPABILITY}>
                    { page }
                </RequireSession>
            } else {
                { page }
            }
        </div>
    }
}
