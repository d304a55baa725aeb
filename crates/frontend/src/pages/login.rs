//! Login form

use super::page_backend;
use crate::components::{ErrorBanner, LoadingSpinner};
use crate::session::{SessionAction, use_session};
use portal_core::LoginRoute;
use portal_core::views::LoginController;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let session = use_session();
    let controller = use_state(LoginController::new);
    let email_ref = use_node_ref();
    let password_ref = use_node_ref();

    let onsubmit = {
        let controller = controller.clone();
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let email = input_value(&email_ref);
            let password = input_value(&password_ref);

            let mut next = (*controller).clone();
            next.state.begin();
            controller.set(next.clone());

            let controller = controller.clone();
            let session = session.clone();
            spawn_local(async move {
                let Some((api, store)) = page_backend(&mut next.state) else {
                    controller.set(next);
                    return;
                };
                let route = next.submit(&api, &store, &email, &password).await;
                controller.set(next);

                match route {
                    Some(LoginRoute::Granted) => {
                        if let Some(session) = &session {
                            session.dispatch(SessionAction::Refresh);
                        }
                    }
                    Some(route) => {
                        if let Some(destination) = route.destination() {
                            navigate(destination);
                        }
                    }
                    None => {}
                }
            });
        })
    };

    html! {
        <form class="w-full max-w-sm bg-white rounded shadow p-8" {onsubmit}>
            <h1 class="text-xl font-semibold mb-6">{"Partner login"}</h1>
            <ErrorBanner error={controller.state.error.clone()} />
            <label class="block mb-4">
                <span class="text-sm text-gray-700">{"Email"}</span>
                <input ref={email_ref} type="email" autocomplete="username"
                    class="mt-1 block w-full rounded border px-3 py-2" />
            </label>
            <label class="block mb-6">
                <span class="text-sm text-gray-700">{"Password"}</span>
                <input ref={password_ref} type="password" autocomplete="current-password"
                    class="mt-1 block w-full rounded border px-3 py-2" />
            </label>
            if controller.state.loading {
                <LoadingSpinner text="Signing in..." />
            } else {
                <button type="submit" class="w-full rounded bg-blue-600 py-2 text-white">
                    {"Log in"}
                </button>
            }
        </form>
    }
}

fn input_value(node: &NodeRef) -> String {
    node.cast::<HtmlInputElement>()
        .map(|input| input.value())
        .unwrap_or_default()
}

/// Onboarding pages live outside this app
fn navigate(destination: &str) {
    let result = web_sys::window().map(|w| w.location().set_href(destination));
    if !matches!(result, Some(Ok(()))) {
        warn!(destination, "Failed to navigate after login");
    }
}
