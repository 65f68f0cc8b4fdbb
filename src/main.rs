use holdview::logging;
use holdview::overlay::{viewport_builder, OverlayApp};
use holdview::settings::{Settings, SETTINGS_FILE};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging);

    let app = OverlayApp::new(&settings)?;

    let native_options = eframe::NativeOptions {
        viewport: viewport_builder(),
        ..Default::default()
    };

    eframe::run_native(
        "holdview",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("overlay event loop failed: {e}"))?;

    Ok(())
}
