mod logic;
mod ui;

use std::collections::HashMap;

/// One [`ChannelPlot`] per selected channel, keyed by channel name so a
/// channel keeps its plot (and cached series) across frames.
#[derive(Default)]
pub struct Plotter {
    plots: HashMap<String, ChannelPlot>,
}

pub struct ChannelPlot {
    channel: String,
    /// Generation of the frame `content` was derived from.
    derived_from: Option<u64>,
    content: PlotContent,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlotContent {
    Series(ChannelSeries),
    /// Nothing to draw for this channel.
    Empty(EmptyReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyReason {
    /// The frame has no data rows or no timestamps.
    NoData,
    /// The frame has data, but not for this channel.
    ChannelMissing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSeries {
    pub values: Vec<f64>,
    /// Shared time axis of the frame.
    pub labels: Vec<f64>,
}

impl Plotter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelPlot {
    pub fn new(channel: &str) -> Self {
        Self {
            channel: channel.to_owned(),
            derived_from: None,
            content: PlotContent::Empty(EmptyReason::NoData),
        }
    }

    #[cfg(test)]
    pub fn channel(&self) -> &str {
        &self.channel
    }
}
