mod app;
mod client;
mod components;
mod config;
mod pages;
mod session;
mod storage;

use app::App;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
