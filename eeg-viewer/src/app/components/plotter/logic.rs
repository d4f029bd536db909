use crate::frame::DataFrame;

use super::{ChannelPlot, ChannelSeries, EmptyReason, PlotContent, Plotter};

impl PlotContent {
    /// Look up `channel` in `frame` and pair its samples with the frame's
    /// timestamps.
    pub fn derive(frame: &DataFrame, channel: &str) -> Self {
        if frame.is_empty() {
            return PlotContent::Empty(EmptyReason::NoData);
        }
        let Some(samples) = frame.channel(channel) else {
            log::warn!("channel {channel} not found in current frame");
            return PlotContent::Empty(EmptyReason::ChannelMissing);
        };
        PlotContent::Series(ChannelSeries {
            values: samples.to_vec(),
            labels: frame.timestamps().to_vec(),
        })
    }
}

impl ChannelSeries {
    /// `[timestamp, value]` pairs. Surplus entries on either side are
    /// dropped.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.labels
            .iter()
            .zip(self.values.iter())
            .map(|(x, y)| [*x, *y])
            .collect()
    }
}

impl ChannelPlot {
    /// The series for the frame with the given generation, derived again
    /// only if the frame changed since the last call.
    pub fn content(&mut self, frame: &DataFrame, generation: u64) -> &PlotContent {
        if self.derived_from != Some(generation) {
            self.content = PlotContent::derive(frame, &self.channel);
            self.derived_from = Some(generation);
        }
        &self.content
    }
}

impl Plotter {
    /// Create plots for newly selected channels and drop plots of channels
    /// that are no longer selected.
    pub fn sync(&mut self, selected_channels: &[String]) {
        self.plots
            .retain(|channel, _| selected_channels.contains(channel));
        for channel in selected_channels {
            if !self.plots.contains_key(channel) {
                log::debug!("creating plot for channel {channel}");
                self.plots
                    .insert(channel.to_owned(), ChannelPlot::new(channel));
            }
        }
    }

    pub fn plot_mut(&mut self, channel: &str) -> Option<&mut ChannelPlot> {
        self.plots.get_mut(channel)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.plots.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }
}
