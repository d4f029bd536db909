use egui::Rect;

use crate::app::{
    events::{ChannelToggled, DropdownToggled, EventQueue, StreamSelected},
    state::ViewerState,
};

const STREAM_PLACEHOLDER: &str = "-- Choose a Stream --";
const PANEL_WIDTH: f32 = 200.0;
const PANEL_MAX_HEIGHT: f32 = 200.0;

impl super::Selector {
    /// Renders the selection controls and queues the user's choices.
    ///
    /// Returns the screen area of the open channel panel (its header
    /// included), if the panel is open.
    pub fn render(
        &mut self,
        state: &ViewerState,
        event_queue: &mut EventQueue,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
    ) -> Option<Rect> {
        self.stream_select(state, event_queue, ui);

        if state.channels().is_empty() {
            return None;
        }
        ui.add_space(20.0);
        self.channel_panel(state, event_queue, ui, ctx)
    }

    fn stream_select(
        &mut self,
        state: &ViewerState,
        event_queue: &mut EventQueue,
        ui: &mut egui::Ui,
    ) {
        let current = &state.selection().selected_stream;
        self.stream_buffer.clone_from(current);

        ui.horizontal(|ui| {
            ui.strong("Select EEG Stream:");
            let selected_text = if current.is_empty() {
                STREAM_PLACEHOLDER
            } else {
                current.as_str()
            };
            egui::ComboBox::from_id_salt("stream_select")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(
                        &mut self.stream_buffer,
                        String::new(),
                        STREAM_PLACEHOLDER,
                    );
                    for stream in state.streams() {
                        ui.selectable_value(
                            &mut self.stream_buffer,
                            stream.name.clone(),
                            stream.name.as_str(),
                        );
                    }
                });
        });

        if &self.stream_buffer != current {
            log::debug!("stream '{}' selected", self.stream_buffer);
            event_queue.queue_event(Box::new(StreamSelected::new(self.stream_buffer.clone())));
        }
    }

    fn channel_panel(
        &mut self,
        state: &ViewerState,
        event_queue: &mut EventQueue,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
    ) -> Option<Rect> {
        let selection = state.selection();

        ui.strong("Select EEG Channels:");
        let header_text = if selection.selected_channels.is_empty() {
            "Select Channels".to_string()
        } else {
            selection.selected_channels.join(", ")
        };
        let header = ui.button(format!("{header_text} ▼"));
        if header.clicked() {
            event_queue.queue_event(Box::new(DropdownToggled::new()));
        }

        if !selection.dropdown_open {
            return None;
        }

        let panel = egui::Area::new(ui.id().with("channel_panel"))
            .order(egui::Order::Foreground)
            .fixed_pos(header.rect.left_bottom())
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(PANEL_WIDTH);
                    egui::ScrollArea::vertical()
                        .max_height(PANEL_MAX_HEIGHT)
                        .show(ui, |ui| {
                            for channel in state.channels() {
                                let mut checked = state.is_channel_selected(channel);
                                if ui.checkbox(&mut checked, channel.as_str()).changed() {
                                    event_queue.queue_event(Box::new(ChannelToggled::new(
                                        channel.clone(),
                                    )));
                                }
                            }
                        });
                });
            });

        // The header counts as part of the panel, so that clicking it
        // toggles the panel instead of closing and reopening it.
        Some(panel.response.rect.union(header.rect))
    }
}
