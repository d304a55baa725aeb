//! Commission rules form

use super::{page_backend, sync_session};
use crate::components::{ErrorBanner, LoadingSpinner};
use crate::session::use_session;
use portal_core::views::CommissionConfigController;
use portal_core::{CommissionConfig, CommissionRule, CommissionType, TransactionType};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Stored rules plus a blank row for every transaction type without one
fn editable(config: &CommissionConfig) -> CommissionConfig {
    let mut draft = config.clone();
    for transaction_type in TransactionType::ALL {
        if draft.rule(transaction_type).is_none() {
            draft.upsert(CommissionRule::blank(transaction_type));
        }
    }
    draft
}

#[function_component(CommissionPage)]
pub fn commission_page() -> Html {
    let session = use_session();
    let controller = use_state(CommissionConfigController::new);
    let draft = use_state(CommissionConfig::blank);

    {
        let controller = controller.clone();
        let draft = draft.clone();
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
                draft.set(editable(next.config()));
                controller.set(next);
            });
        });
    }

    let update_rule = {
        let draft = draft.clone();
        Callback::from(move |rule: CommissionRule| {
            let mut next = (*draft).clone();
            next.upsert(rule);
            draft.set(next);
        })
    };

    let onsubmit = {
        let controller = controller.clone();
        let draft = draft.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let mut next = (*controller).clone();
            next.state.begin();
            controller.set(next.clone());

            let config = (*draft).clone();
            let controller = controller.clone();
            let session = session.clone();
            spawn_local(async move {
                if let Some((api, store)) = page_backend(&mut next.state) {
                    next.save(&api, &store, config).await;
                }
                sync_session(&next.state, session.as_ref());
                controller.set(next);
            });
        })
    };

    let rows = TransactionType::ALL.into_iter().filter_map(|transaction_type| {
        draft.rule(transaction_type).cloned().map(|rule| {
            html! {
                <RuleRow key={transaction_type.as_str()} {rule} on_change={update_rule.clone()} />
            }
        })
    });

    html! {
        <section class="p-6">
            <h2 class="text-lg font-semibold mb-4">{"Commission rules"}</h2>
            <ErrorBanner error={controller.state.error.clone()} />
            if !controller.exists() && !controller.state.loading {
                <p class="mb-4 text-gray-600">{"No commission rules configured yet."}</p>
            }
            if controller.state.loading {
                <LoadingSpinner text="Loading commission rules..." />
            } else {
                <form {onsubmit}>
                    <table class="w-full text-left mb-4">
                        <thead>
                            <tr>
                                <th>{"Transaction"}</th>
                                <th>{"Enabled"}</th>
                                <th>{"Type"}</th>
                                <th>{"Value"}</th>
                            </tr>
                        </thead>
                        <tbody>{ for rows }</tbody>
                    </table>
                    <button type="submit" class="rounded bg-blue-600 px-4 py-2 text-white">
                        { if controller.exists() { "Update rules" } else { "Create rules" } }
                    </button>
                </form>
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct RuleRowProps {
    rule: CommissionRule,
    on_change: Callback<CommissionRule>,
}

#[function_component(RuleRow)]
fn rule_row(props: &RuleRowProps) -> Html {
    let on_enabled = {
        let rule = props.rule.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            on_change.emit(CommissionRule {
                enabled: input.checked(),
                ..rule.clone()
            });
        })
    };

    let on_type = {
        let rule = props.rule.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            let commission_type = match select.value().as_str() {
                "fixed" => CommissionType::Fixed,
                _ => CommissionType::Percentage,
            };
            on_change.emit(CommissionRule {
                commission_type,
                ..rule.clone()
            });
        })
    };

    let on_value = {
        let rule = props.rule.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            // Unparseable input becomes NaN and fails validation on save
            let value = input.value().trim().parse().unwrap_or(f64::NAN);
            on_change.emit(CommissionRule {
                value,
                ..rule.clone()
            });
        })
    };

    let rule = &props.rule;
    let is_fixed = rule.commission_type == CommissionType::Fixed;

    html! {
        <tr>
            <td class="capitalize">{ rule.transaction_type.as_str() }</td>
            <td><input type="checkbox" checked={rule.enabled} onchange={on_enabled} /></td>
            <td>
                <select onchange={on_type}>
                    <option value="percentage" selected={!is_fixed}>{"Percentage"}</option>
                    <option value="fixed" selected={is_fixed}>{"Fixed"}</option>
                </select>
            </td>
            <td>
                <input type="number" min="0" step="0.01" class="rounded border px-2 py-1"
                    value={rule.value.to_string()} oninput={on_value} />
            </td>
        </tr>
    }
}
