//! Sittin with Shireen Web Frontend
//!
//! Leptos-based WASM frontend: the public pages, the merch store with its
//! cart and checkout, and the admin dashboard.

mod app;
mod browser;
mod components;
mod pages;
mod state;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
