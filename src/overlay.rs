use crate::catalog::{scan_images, RotationState};
use crate::detector::HoldDetector;
use crate::hotkey::{press_chord, ChordBindings, SystemBindings};
use crate::presenter::{DisplayContent, Presenter, Surface};
use crate::settings::Settings;
use eframe::egui;
use std::time::{Duration, Instant};

/// Wakeup cadence while idle, so press edges are noticed promptly even
/// though no probe deadline is pending.
const IDLE_WAKE: Duration = Duration::from_millis(50);

/// Viewport options for the overlay: frameless, transparent, always on top,
/// click-through, no taskbar entry and never focused. The chord is held
/// while the user works in another application, so the overlay must not
/// steal input from it. Created hidden; visibility is driven per cycle.
pub fn viewport_builder() -> egui::ViewportBuilder {
    egui::ViewportBuilder::default()
        .with_decorations(false)
        .with_transparent(true)
        .with_always_on_top()
        .with_taskbar(false)
        .with_mouse_passthrough(true)
        .with_active(false)
        .with_visible(false)
        .with_maximized(true)
}

/// [`Surface`] implementation that queues effects instead of applying them.
/// The presenter mutates plain state here; [`OverlayApp`] translates it into
/// viewport commands and texture uploads once per frame.
#[derive(Debug, Default)]
pub struct ViewportSurface {
    visible: bool,
    visibility_dirty: bool,
    pending: Option<DisplayContent>,
}

impl ViewportSurface {
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Visibility change queued since the last call, if any.
    pub fn take_visibility_change(&mut self) -> Option<bool> {
        if self.visibility_dirty {
            self.visibility_dirty = false;
            Some(self.visible)
        } else {
            None
        }
    }

    /// Content queued by the last `show`, if not yet consumed.
    pub fn take_content(&mut self) -> Option<DisplayContent> {
        self.pending.take()
    }
}

impl Surface for ViewportSurface {
    fn show(&mut self, content: DisplayContent) {
        self.pending = Some(content);
        self.visible = true;
        self.visibility_dirty = true;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.visibility_dirty = true;
    }
}

/// The resident overlay application. Each frame runs one cooperative
/// presenter step, applies queued surface effects and draws the current
/// image letterboxed into the work area.
pub struct OverlayApp {
    presenter: Presenter,
    bindings: SystemBindings,
    surface: ViewportSurface,
    texture: Option<egui::TextureHandle>,
    press_bound: bool,
}

impl OverlayApp {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let mut bindings = SystemBindings::new(press_chord())?;
        let press_bound = match bindings.register() {
            Ok(()) => true,
            Err(e) => {
                // Non-fatal: the overlay stays inert until a later
                // registration attempt succeeds.
                tracing::warn!(error = %e, "failed to register press binding at startup");
                false
            }
        };

        let images_dir = match std::env::current_dir() {
            Ok(cwd) => cwd.join(settings.images_dir()),
            Err(_) => settings.images_dir(),
        };
        let paths = scan_images(&images_dir, settings.sort_images);
        tracing::info!(
            dir = %images_dir.display(),
            count = paths.len(),
            "image catalog loaded"
        );

        let presenter = Presenter::new(
            RotationState::new(paths),
            HoldDetector::new(settings.poll_interval()),
        );

        Ok(Self {
            presenter,
            bindings,
            surface: ViewportSurface::default(),
            texture: None,
            press_bound,
        })
    }

    fn retry_press_binding(&mut self) {
        match self.bindings.register() {
            Ok(()) => {
                tracing::info!("press binding registered");
                self.press_bound = true;
            }
            Err(e) => tracing::warn!(error = %e, "press binding registration retry failed"),
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context, content: &DisplayContent) {
        self.texture = match image::load_from_memory(&content.bytes) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                Some(ctx.load_texture("overlay-image", color_image, egui::TextureOptions::LINEAR))
            }
            Err(e) => {
                // Keep the cycle going with a blank overlay rather than
                // aborting the press/release state machine.
                tracing::error!(
                    source = %content.source.display(),
                    error = %e,
                    "failed to decode image; overlay will be blank"
                );
                None
            }
        };
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.press_bound {
            let activated = ctx.input(|i| {
                i.events
                    .iter()
                    .any(|e| matches!(e, egui::Event::WindowFocused(true)))
            });
            if activated {
                self.retry_press_binding();
            }
        }

        self.presenter
            .tick(Instant::now(), &mut self.bindings, &mut self.surface);

        if let Some(content) = self.surface.take_content() {
            self.load_texture(ctx, &content);
        }
        if let Some(visible) = self.surface.take_visibility_change() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Visible(visible));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if !self.surface.visible() {
                    return;
                }
                if let Some(texture) = &self.texture {
                    let avail = ui.max_rect();
                    let size = texture.size_vec2();
                    let scale = (avail.width() / size.x).min(avail.height() / size.y);
                    let rect = egui::Rect::from_center_size(avail.center(), size * scale);
                    ui.painter().image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            });

        let wake = self
            .presenter
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAKE)
            .min(IDLE_WAKE);
        ctx.request_repaint_after(wake);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Cancels the poll synchronously; no stray probe fires after this.
        self.presenter.shutdown(&mut self.bindings, &mut self.surface);
    }
}
