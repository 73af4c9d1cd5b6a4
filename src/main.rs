mod app;
mod components;
mod config;
mod core;
mod utils;

use app::App;
use config::AppConfig;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();

    let (config, problem) = AppConfig::load();
    utils::logger::init(config.log_level());
    if let Some(problem) = problem {
        log::error!("invalid config.toml, using defaults: {}", problem);
    }

    let root = document()
        .get_element_by_id("app")
        .expect("Failed to find #app element")
        .unchecked_into::<web_sys::HtmlElement>();

    mount_to(root, move || view! { <App config=config /> }).forget();
}
