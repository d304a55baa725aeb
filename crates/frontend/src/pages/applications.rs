//! Applications received against the partner's plans

use super::{page_backend, sync_session};
use crate::components::{ErrorBanner, LoadingSpinner};
use crate::session::use_session;
use portal_core::aggregate::ListFilter;
use portal_core::views::InsuranceApplicationsController;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

const STATUSES: [&str; 3] = ["pending", "approved", "rejected"];

#[function_component(ApplicationsPage)]
pub fn applications_page() -> Html {
    let session = use_session();
    let controller = use_state(InsuranceApplicationsController::new);
    let filter = use_state(ListFilter::default);

    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            let mut next = (*controller).clone();
            next.state.begin();
            controller.set(next.clone());

            spawn_local(async move {
                if let Some((api, store)) = page_backend(&mut next.state) {
                    next.load(&api, &store).await;
                }
                sync_session(&next.state, session.as_ref());
                controller.set(next);
            });
        });
    }

    let on_search = {
        let filter = filter.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            filter.set(ListFilter {
                search: input.value(),
                ..(*filter).clone()
            });
        })
    };

    let on_status = {
        let filter = filter.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            let value = select.value();
            filter.set(ListFilter {
                status: (!value.is_empty()).then_some(value),
                ..(*filter).clone()
            });
        })
    };

    let counts = controller.status_counts();
    let rows = controller.rows(&filter);

    html! {
        <section class="p-6">
            <h2 class="text-lg font-semibold mb-4">{"Insurance applications"}</h2>
            <ErrorBanner error={controller.state.error.clone()} />
            <div class="flex gap-6 mb-4 text-sm text-gray-700">
                { for STATUSES.iter().map(|status| html! {
                    <span>{ format!("{status}: {}", counts.get(*status).copied().unwrap_or_default()) }</span>
                }) }
            </div>
            <div class="flex gap-4 mb-4">
                <input type="search" placeholder="Search applicant or plan" class="rounded border px-3 py-2"
                    value={filter.search.clone()} oninput={on_search} />
                <select class="rounded border px-3 py-2" onchange={on_status}>
                    <option value="">{"All statuses"}</option>
                    { for STATUSES.iter().map(|status| html! {
                        <option value={*status}>{ *status }</option>
                    }) }
                </select>
            </div>
            if controller.state.loading {
                <LoadingSpinner text="Loading applications..." />
            } else if rows.is_empty() {
                <p class="text-gray-600">{"No applications found."}</p>
            } else {
                <table class="w-full text-left">
                    <thead>
                        <tr>
                            <th>{"Applicant"}</th>
                            <th>{"Email"}</th>
                            <th>{"Plan"}</th>
                            <th>{"Status"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.iter().map(|row| html! {
                            <tr key={row.application.id.clone()}>
                                <td>{ row.application.applicant_name.clone() }</td>
                                <td>{ row.application.applicant_email.clone().unwrap_or_default() }</td>
                                <td>{ row.plan.map(|plan| plan.plan_name.clone()).unwrap_or_else(|| "Unknown plan".to_string()) }</td>
                                <td>{ row.application.status.clone() }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            }
        </section>
    }
}
