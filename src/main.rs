mod app;
mod views;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    afterimage_capture::init();
    match afterimage_capture::list_cameras() {
        Ok(cameras) if cameras.is_empty() => warn!("no cameras attached"),
        Ok(cameras) => {
            for camera in &cameras {
                info!(index = camera.index, name = %camera.name, "camera found");
            }
        }
        Err(err) => warn!(%err, "camera enumeration failed"),
    }

    iced::application(app::App::new, app::App::update, app::App::view)
        .subscription(app::App::subscription)
        .title(app::App::title)
        .theme(app::App::theme)
        .window(iced::window::Settings {
            size: iced::Size::new(1024.0, 768.0),
            ..Default::default()
        })
        .run()
}
