use crate::protocol::WireFrame;

/// One snapshot of sample data as pushed by the server.
///
/// On the wire, `selected_channels[i]` names the samples at `data[i]`. Here
/// each channel carries its own samples, all channels share one time axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataFrame {
    timestamps: Vec<f64>,
    channels: Vec<ChannelSamples>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSamples {
    pub name: String,
    pub samples: Vec<f64>,
}

impl DataFrame {
    pub fn from_wire(frame: WireFrame) -> Self {
        let WireFrame {
            data,
            timestamps,
            selected_channels,
        } = frame;
        if data.len() != selected_channels.len() {
            log::warn!(
                "frame has {} data rows but {} channel names, dropping unmatched entries",
                data.len(),
                selected_channels.len()
            );
        }
        let channels = selected_channels
            .into_iter()
            .zip(data)
            .map(|(name, samples)| ChannelSamples { name, samples })
            .collect();
        Self {
            timestamps,
            channels,
        }
    }

    /// Samples of the first channel with the given name.
    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels
            .iter()
            .find(|ch| ch.name == name)
            .map(|ch| ch.samples.as_slice())
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    #[cfg(test)]
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|ch| ch.name.as_str())
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// A frame without any data rows or without timestamps has nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() || self.timestamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(data: Vec<Vec<f64>>, timestamps: Vec<f64>, names: &[&str]) -> WireFrame {
        WireFrame {
            data,
            timestamps,
            selected_channels: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_channel_lookup_by_name() {
        let frame = DataFrame::from_wire(wire(
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            vec![0.0, 1.0, 2.0],
            &["C1", "C2"],
        ));
        assert_eq!(frame.channel("C2"), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(frame.channel("C3"), None);
        assert_eq!(frame.timestamps(), &[0.0, 1.0, 2.0]);
        assert_eq!(frame.channel_names().collect::<Vec<_>>(), vec!["C1", "C2"]);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let frame = DataFrame::from_wire(wire(
            vec![vec![1.0], vec![2.0]],
            vec![0.0],
            &["Fz", "Fz"],
        ));
        assert_eq!(frame.channel("Fz"), Some(&[1.0][..]));
    }

    #[test]
    fn test_unmatched_rows_are_dropped() {
        let frame = DataFrame::from_wire(wire(
            vec![vec![1.0], vec![2.0], vec![3.0]],
            vec![0.0],
            &["A", "B"],
        ));
        assert_eq!(frame.num_channels(), 2);

        let frame = DataFrame::from_wire(wire(vec![vec![1.0]], vec![0.0], &["A", "B"]));
        assert_eq!(frame.num_channels(), 1);
        assert_eq!(frame.channel("B"), None);
    }

    #[test]
    fn test_empty_frames() {
        assert!(DataFrame::default().is_empty());
        assert!(DataFrame::from_wire(wire(vec![vec![1.0]], vec![], &["A"])).is_empty());
        assert!(DataFrame::from_wire(wire(vec![], vec![0.0], &[])).is_empty());
        assert!(!DataFrame::from_wire(wire(vec![vec![1.0]], vec![0.0], &["A"])).is_empty());
    }
}
