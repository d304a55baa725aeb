//! "My insurance plans" page

use super::{page_backend, sync_session};
use crate::components::{ErrorBanner, LoadingSpinner};
use crate::session::use_session;
use portal_core::aggregate::ListFilter;
use portal_core::views::InsuranceListController;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[function_component(PlansPage)]
pub fn plans_page() -> Html {
    let session = use_session();
    let controller = use_state(InsuranceListController::new);
    let filter = use_state(ListFilter::default);

    {
        let controller = controller.clone();
        let session = session.clone();
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

    let on_delete = {
        let controller = controller.clone();
        let session = session.clone();
        Callback::from(move |plan_id: String| {
            let mut next = (*controller).clone();
            let controller = controller.clone();
            let session = session.clone();
            spawn_local(async move {
                if let Some((api, store)) = page_backend(&mut next.state) {
                    next.delete_plan(&api, &store, &plan_id).await;
                }
                sync_session(&next.state, session.as_ref());
                controller.set(next);
            });
        })
    };

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

    let on_policy_type = {
        let filter = filter.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            let value = select.value();
            filter.set(ListFilter {
                policy_type: (!value.is_empty()).then_some(value),
                ..(*filter).clone()
            });
        })
    };

    let rows = controller.rows(&filter);

    html! {
        <section class="p-6">
            <h2 class="text-lg font-semibold mb-4">{"My insurance plans"}</h2>
            <ErrorBanner error={controller.state.error.clone()} />
            <div class="flex gap-4 mb-4">
                <input type="search" placeholder="Search plans" class="rounded border px-3 py-2"
                    value={filter.search.clone()} oninput={on_search} />
                <select class="rounded border px-3 py-2" onchange={on_policy_type}>
                    <option value="">{"All policy types"}</option>
                    { for controller.policy_types().into_iter().map(|policy_type| html! {
                        <option value={policy_type.clone()}>{policy_type}</option>
                    }) }
                </select>
            </div>
            if controller.state.loading {
                <LoadingSpinner text="Loading plans..." />
            } else if rows.is_empty() {
                <p class="text-gray-600">{"No insurance plans found."}</p>
            } else {
                <table class="w-full text-left">
                    <thead>
                        <tr>
                            <th>{"Plan"}</th>
                            <th>{"Policy type"}</th>
                            <th>{"Status"}</th>
                            <th>{"Applications"}</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.iter().map(|row| {
                            let plan_id = row.plan.id.clone();
                            let on_delete = on_delete.clone();
                            html! {
                                <tr key={row.plan.id.clone()}>
                                    <td>{ row.plan.plan_name.clone() }</td>
                                    <td>{ row.plan.policy_type.clone() }</td>
                                    <td>{ row.plan.status.clone().unwrap_or_default() }</td>
                                    <td>{ row.application_count.to_string() }</td>
                                    <td>
                                        <button class="text-red-600"
                                            onclick={Callback::from(move |_| on_delete.emit(plan_id.clone()))}>
                                            {"Delete"}
                                        </button>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            }
        </section>
    }
}
