//! Application entry point and thread bootstrapper.

mod input;
mod logic;
mod models;
mod render;
mod shared;
mod state;
mod system;
mod views;

use crate::models::settings::EditorSettings;
use crate::system::bus::EditorBus;

fn main() {
    unsafe {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    log::info!("MAIN: Booting fabler...");

    let bus = EditorBus::new();
    let settings = EditorSettings::load();

    logic::start_thread(bus.clone(), settings);
    render::app::App::run(bus);
}
