use derive_new::new;
use egui::Pos2;

use app_core::event::AppEvent;

use super::state::ViewerState;
use crate::backend_state::TransportEvent;

pub type EventQueue = app_core::event::EventQueue<ViewerState>;

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

#[derive(new)]
pub struct ConnectionOpened;

#[derive(new)]
pub struct ConnectionClosed;

#[derive(new)]
pub struct TransportFailed {
    msg: String,
}

#[derive(new)]
pub struct MessageReceived {
    text: String,
}

#[derive(new)]
pub struct StreamSelected {
    stream_name: String,
}

#[derive(new)]
pub struct ChannelToggled {
    channel: String,
}

#[derive(new)]
pub struct DropdownToggled;

#[derive(new)]
pub struct PointerPressed {
    pos: Pos2,
}

/// Translate something the transport reported into the matching event.
pub fn from_transport(event: TransportEvent) -> Box<dyn AppEvent<App = ViewerState>> {
    match event {
        TransportEvent::Opened => Box::new(ConnectionOpened::new()),
        TransportEvent::Message(text) => Box::new(MessageReceived::new(text)),
        TransportEvent::Error(msg) => Box::new(TransportFailed::new(msg)),
        TransportEvent::Closed => Box::new(ConnectionClosed::new()),
    }
}

// ---------------------------------------------------------------------------
//
//
// apply()
//
//
// ---------------------------------------------------------------------------

impl AppEvent for ConnectionOpened {
    type App = ViewerState;

    fn apply(&mut self, app: &mut Self::App) -> Result<(), String> {
        app.connection_opened();
        Ok(())
    }

    fn describe(&self) -> &str {
        "connection opened"
    }
}

impl AppEvent for ConnectionClosed {
    type App = ViewerState;

    fn apply(&mut self, app: &mut Self::App) -> Result<(), String> {
        app.connection_closed();
        Ok(())
    }

    fn describe(&self) -> &str {
        "connection closed"
    }
}

impl AppEvent for TransportFailed {
    type App = ViewerState;

    fn apply(&mut self, app: &mut Self::App) -> Result<(), String> {
        app.transport_error(&self.msg);
        Ok(())
    }

    fn describe(&self) -> &str {
        "transport error"
    }
}

impl AppEvent for MessageReceived {
    type App = ViewerState;

    fn apply(&mut self, app: &mut Self::App) -> Result<(), String> {
        app.apply_inbound(&self.text)
    }

    fn describe(&self) -> &str {
        "inbound message"
    }
}

impl AppEvent for StreamSelected {
    type App = ViewerState;

    fn apply(&mut self, app: &mut Self::App) -> Result<(), String> {
        app.select_stream(&self.stream_name);
        Ok(())
    }

    fn describe(&self) -> &str {
        "stream selected"
    }
}

impl AppEvent for ChannelToggled {
    type App = ViewerState;

    fn apply(&mut self, app: &mut Self::App) -> Result<(), String> {
        app.toggle_channel(&self.channel);
        Ok(())
    }

    fn describe(&self) -> &str {
        "channel toggled"
    }
}

impl AppEvent for DropdownToggled {
    type App = ViewerState;

    fn apply(&mut self, app: &mut Self::App) -> Result<(), String> {
        app.toggle_dropdown();
        Ok(())
    }

    fn describe(&self) -> &str {
        "channel panel toggled"
    }
}

impl AppEvent for PointerPressed {
    type App = ViewerState;

    fn apply(&mut self, app: &mut Self::App) -> Result<(), String> {
        app.pointer_down(self.pos);
        Ok(())
    }

    fn describe(&self) -> &str {
        "pointer pressed"
    }
}
