mod components;
mod config;
mod events;
mod session;
mod state;

pub use config::Config;
pub use state::ConnectionState;

use self::components::{Plotter, Selector};
use self::session::ViewerSession;
use crate::backend_state::Transport;
use app_core::frontend::GlobalListeners;
use egui::Pos2;

pub struct EguiApp {
    config: Config,
    pointer_listeners: GlobalListeners<Pos2>,
    session: ViewerSession,
    selector: Selector,
    plotter: Plotter,
    shortcuts_modal_open: bool,
}

impl EguiApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: Config,
        transport: Box<dyn Transport>,
    ) -> Self {
        let mut pointer_listeners = GlobalListeners::new();
        let session = ViewerSession::start(transport, &mut pointer_listeners);
        Self {
            config,
            pointer_listeners,
            session,
            selector: Selector::new(),
            plotter: Plotter::new(),
            shortcuts_modal_open: false,
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(self.config.repaint_interval());

        let mut should_quit = false;
        let mut pressed_at = None;

        // Handle keyboard and pointer input.
        ctx.input(|i| {
            // Help window.
            if i.key_pressed(egui::Key::F1) {
                self.shortcuts_modal_open = !self.shortcuts_modal_open;
            }
            // Close app.
            if i.key_pressed(egui::Key::F10) {
                should_quit = true;
            }
            if i.pointer.any_pressed() {
                pressed_at = i.pointer.interact_pos();
            }
        });
        if let Some(pos) = pressed_at {
            self.pointer_listeners.publish(pos);
        }

        self.session.update();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_shortcut_modal(ctx);
            self.menu(ui, ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.central_panel(ui, ctx);
        });

        if should_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.teardown();
    }
}

impl EguiApp {
    fn central_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("EEG Visualizer");
        ui.add_space(10.0);

        let session = &mut self.session;
        let bounds = self
            .selector
            .render(&session.state, &mut session.event_queue, ui, ctx);
        if let Some(bounds) = bounds {
            self.session.state.set_dropdown_bounds(bounds);
        }

        ui.separator();
        self.plotter.render(&self.session.state, ui);
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Quit (F10)").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.toggle_value(&mut self.shortcuts_modal_open, "Help");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::widgets::global_theme_preference_buttons(ui);
                ui.separator();
                self.connection_status(ui);
            });
        });
    }

    fn connection_status(&self, ui: &mut egui::Ui) {
        let state = &self.session.state;
        let (text, color) = match state.connection() {
            ConnectionState::Connecting => ("Connecting", egui::Color32::YELLOW),
            ConnectionState::Open => ("Open", egui::Color32::GREEN),
            ConnectionState::Closed => ("Closed", egui::Color32::RED),
        };
        ui.label(format!(
            "{} streams, {} channels, {} in frame",
            state.streams().len(),
            state.channels().len(),
            state.frame().num_channels()
        ));
        ui.colored_label(color, text)
            .on_hover_text(self.config.url.as_str());
    }

    fn render_shortcut_modal(&mut self, ctx: &egui::Context) {
        if self.shortcuts_modal_open
            && egui::Modal::new("shortcut_modal".into())
                .show(ctx, |ui| {
                    ui.heading("Keyboard Shortcuts");
                    ui.separator();
                    ui.label("F1 = Show Keyboard Shortcuts");
                    ui.separator();
                    ui.label("F10 = Quit App");
                    ui.separator();
                })
                .should_close()
        {
            self.shortcuts_modal_open = false;
        };
    }
}
