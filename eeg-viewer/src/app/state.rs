//! Everything the viewer knows, mutated only from the UI thread and only
//! through the methods below.

use egui::{Pos2, Rect};

use crate::{
    frame::DataFrame,
    protocol::{parse_inbound, OutboundMessage, StreamDescriptor},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    /// Empty while the placeholder entry is selected.
    pub selected_stream: String,
    /// In order of first selection.
    pub selected_channels: Vec<String>,
    pub dropdown_open: bool,
}

pub struct ViewerState {
    connection: ConnectionState,
    streams: Vec<StreamDescriptor>,
    channels: Vec<String>,
    frame: DataFrame,
    frame_generation: u64,
    selection: SelectionState,
    /// Screen area covered by the channel panel the last time it was drawn.
    dropdown_bounds: Option<Rect>,
    outbox: Vec<OutboundMessage>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerState {
    pub fn new() -> Self {
        Self {
            connection: ConnectionState::Connecting,
            streams: Vec::new(),
            channels: Vec::new(),
            frame: DataFrame::default(),
            frame_generation: 0,
            selection: SelectionState::default(),
            dropdown_bounds: None,
            outbox: Vec::new(),
        }
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Increases by one with every accepted frame.
    pub fn frame_generation(&self) -> u64 {
        self.frame_generation
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    // -----------------------------------------------------------------------
    // connection lifecycle
    // -----------------------------------------------------------------------

    pub fn connection_opened(&mut self) {
        match self.connection {
            ConnectionState::Connecting => {
                log::info!("connected to stream server");
                self.connection = ConnectionState::Open;
            }
            ConnectionState::Open => log::debug!("connection already open"),
            ConnectionState::Closed => {
                log::warn!("ignoring open notification for a closed connection")
            }
        }
    }

    pub fn connection_closed(&mut self) {
        if self.connection != ConnectionState::Closed {
            log::info!("connection to stream server closed");
            self.connection = ConnectionState::Closed;
        }
    }

    /// Transport errors are only logged, the transport reports a close
    /// separately if it cannot continue.
    pub fn transport_error(&mut self, msg: &str) {
        log::error!("transport error: {msg}");
    }

    // -----------------------------------------------------------------------
    // inbound messages
    // -----------------------------------------------------------------------

    /// Merge one inbound message into the state.
    ///
    /// Only the slices whose fields are present in the message are replaced.
    /// A message that does not parse changes nothing.
    pub fn apply_inbound(&mut self, text: &str) -> Result<(), String> {
        let mut msg = parse_inbound(text)?;
        log::debug!("received from server: {msg:?}");

        if let Some(err) = msg.error.take() {
            log::error!("server reported an error: {err}");
        }
        if let Some(streams) = msg.streams.take() {
            log::debug!("replacing stream list ({} streams)", streams.len());
            self.streams = streams;
        }
        if let Some(channels) = msg.channels.take() {
            log::debug!("replacing channel list ({} channels)", channels.len());
            self.channels = channels;
        }
        if let Some(frame) = msg.take_frame() {
            self.frame = DataFrame::from_wire(frame);
            self.frame_generation += 1;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // user interaction
    // -----------------------------------------------------------------------

    /// Select a stream by name, the empty name is the placeholder.
    ///
    /// The channel selection is always cleared. A request for the stream is
    /// queued only for a real stream on an open connection.
    pub fn select_stream(&mut self, name: &str) {
        self.selection.selected_stream = name.to_owned();
        self.selection.selected_channels.clear();

        if name.is_empty() {
            return;
        }
        if self.connection != ConnectionState::Open {
            log::warn!("not connected, stream '{name}' is not requested from the server");
            return;
        }
        self.outbox.push(OutboundMessage::select_stream(name));
    }

    pub fn toggle_channel(&mut self, channel: &str) {
        let selected = &mut self.selection.selected_channels;
        if let Some(idx) = selected.iter().position(|ch| ch == channel) {
            selected.remove(idx);
        } else {
            selected.push(channel.to_owned());
        }
    }

    pub fn is_channel_selected(&self, channel: &str) -> bool {
        self.selection
            .selected_channels
            .iter()
            .any(|ch| ch == channel)
    }

    pub fn toggle_dropdown(&mut self) {
        self.selection.dropdown_open = !self.selection.dropdown_open;
        if !self.selection.dropdown_open {
            self.dropdown_bounds = None;
        }
    }

    pub fn set_dropdown_bounds(&mut self, bounds: Rect) {
        self.dropdown_bounds = Some(bounds);
    }

    /// A pointer was pressed somewhere in the window. Closes the channel
    /// panel if the press landed outside of it.
    pub fn pointer_down(&mut self, pos: Pos2) {
        if !self.selection.dropdown_open {
            return;
        }
        // Not drawn yet, we cannot tell inside from outside.
        let Some(bounds) = self.dropdown_bounds else {
            return;
        };
        if !bounds.contains(pos) {
            log::debug!("pointer pressed outside of channel panel, closing it");
            self.selection.dropdown_open = false;
            self.dropdown_bounds = None;
        }
    }

    /// Outbound messages queued since the last call.
    pub fn take_outbox(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }
}
