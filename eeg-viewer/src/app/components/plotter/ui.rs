use egui::Color32;

use crate::app::state::ViewerState;

use super::{ChannelPlot, PlotContent};

const LINE_COLOR: Color32 = Color32::BLUE;
const LINE_WIDTH: f32 = 1.5;
const PLOT_HEIGHT: f32 = 300.0;

impl super::Plotter {
    /// Draw one plot per selected channel, in selection order.
    pub fn render(&mut self, state: &ViewerState, ui: &mut egui::Ui) {
        let selected = &state.selection().selected_channels;
        self.sync(selected);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for channel in selected {
                    let Some(plot) = self.plot_mut(channel) else {
                        continue;
                    };
                    ui.push_id(channel, |ui| {
                        plot.render(state, ui);
                    });
                    ui.add_space(20.0);
                }
            });
    }
}

impl ChannelPlot {
    fn render(&mut self, state: &ViewerState, ui: &mut egui::Ui) {
        ui.heading(format!("EEG Data for {}", self.channel));
        let channel = self.channel.clone();
        match self.content(state.frame(), state.frame_generation()) {
            PlotContent::Series(series) => {
                let points = series.points();
                egui_plot::Plot::new(("channel_plot", &channel))
                    .height(PLOT_HEIGHT)
                    .x_axis_label("time")
                    .legend(egui_plot::Legend::default())
                    .show(ui, |plot_ui| {
                        plot_ui.line(
                            egui_plot::Line::new(points)
                                .color(LINE_COLOR)
                                .width(LINE_WIDTH)
                                .name(&channel),
                        );
                    });
            }
            PlotContent::Empty(_) => {
                ui.label(format!("No data available for {channel}."));
            }
        }
    }
}
