use portal_core::ViewError;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct ErrorBannerProps {
    pub error: Option<ViewError>,
}

/// Banner for the page's last failure; renders nothing when there is none
#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    match &props.error {
        Some(error) => html! {
            <div class="mb-4 rounded border border-red-300 bg-red-50 px-4 py-3 text-red-700" role="alert">
                { error.to_string() }
            </div>
        },
        None => html! {},
    }
}
