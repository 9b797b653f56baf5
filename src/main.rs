use iced::{window, Size};
use webpage_capture::{app, config, logging};

fn main() -> iced::Result {
    if let Err(err) = logging::init_logging() {
        eprintln!("webpage-capture: logging disabled: {:#}", err);
    }

    let config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("webpage-capture error: {:#}", err);
            std::process::exit(1);
        }
    };
    tracing::info!(endpoint = %config.endpoint, save_mode = ?config.save_mode, "starting");

    iced::application(move || app::CaptureApp::new(&config), app::update, app::view)
        .title(app::title)
        .window(window::Settings {
            size: Size::new(560.0, 600.0),
            ..Default::default()
        })
        .run()
}
