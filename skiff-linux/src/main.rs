mod webview;
mod window;

use libadwaita as adw;
use libadwaita::prelude::*;

use skiff_core::paths::ProfilePaths;

const APP_ID: &str = "dev.skiff.Skiff";

fn main() -> gtk4::glib::ExitCode {
    env_logger::init();

    let paths = match ProfilePaths::from_env() {
        Ok(paths) => paths,
        Err(e) => {
            log::error!("Cannot locate a profile directory: {}", e);
            return gtk4::glib::ExitCode::FAILURE;
        }
    };
    log::info!("Using profile {}", paths.config_file.display());

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        window::build_window(app, &paths);
    });

    app.run()
}
