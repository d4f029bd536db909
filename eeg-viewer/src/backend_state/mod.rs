mod transport;

pub use transport::{Incoming, Transport, WsTransport};

use std::sync::mpsc::Sender;

use app_core::backend::BackendState;

use crate::{app::ConnectionState, protocol::OutboundMessage};

/// Everything the backend reports to the UI thread, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Error(String),
    Closed,
}

/// Owns the connection to the stream server.
///
/// The connection is attempted once, on the first poll of the backend loop.
/// There is no reconnect: once closed, it stays closed.
pub struct BackendAppState {
    transport: Box<dyn Transport>,
    status: ConnectionState,
    event_tx: Sender<TransportEvent>,
    close_requested: bool,
}

impl BackendAppState {
    pub fn new(transport: Box<dyn Transport>, event_tx: Sender<TransportEvent>) -> Self {
        Self {
            transport,
            status: ConnectionState::Connecting,
            event_tx,
            close_requested: false,
        }
    }

    pub fn status(&self) -> ConnectionState {
        self.status
    }

    pub fn send(&mut self, msg: &OutboundMessage) -> Result<(), String> {
        if self.status != ConnectionState::Open {
            return Err(format!(
                "cannot send {msg:?}, connection is {:?}",
                self.status
            ));
        }
        let text = msg.to_json()?;
        self.transport.send_text(&text)?;
        log::info!("sent {text}");
        Ok(())
    }

    /// Request the transport to close. Only the first call reaches the
    /// transport.
    pub fn close(&mut self) {
        if self.close_requested {
            return;
        }
        self.close_requested = true;
        if let Err(err) = self.transport.close() {
            log::error!("{err}");
        }
        self.mark_closed();
    }

    fn connect(&mut self) {
        match self.transport.connect() {
            Ok(()) => {
                self.status = ConnectionState::Open;
                self.emit(TransportEvent::Opened);
            }
            Err(err) => {
                self.emit(TransportEvent::Error(err));
                self.mark_closed();
            }
        }
    }

    fn read_once(&mut self) -> bool {
        match self.transport.read() {
            Ok(Incoming::Text(text)) => {
                self.emit(TransportEvent::Message(text));
                true
            }
            Ok(Incoming::Idle) => false,
            Ok(Incoming::Closed) => {
                self.mark_closed();
                true
            }
            Err(err) => {
                self.emit(TransportEvent::Error(err));
                self.mark_closed();
                true
            }
        }
    }

    fn mark_closed(&mut self) {
        if self.status != ConnectionState::Closed {
            self.status = ConnectionState::Closed;
            self.emit(TransportEvent::Closed);
        }
    }

    fn emit(&self, event: TransportEvent) {
        if self.event_tx.send(event).is_err() {
            log::debug!("UI is gone, dropping transport event");
        }
    }
}

impl BackendState for BackendAppState {
    fn poll(&mut self) -> bool {
        match self.status {
            ConnectionState::Connecting => {
                self.connect();
                true
            }
            ConnectionState::Open => self.read_once(),
            ConnectionState::Closed => false,
        }
    }

    fn shutdown(&mut self) {
        self.close();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::ScriptedTransport;
    use std::{
        sync::{
            atomic::Ordering::SeqCst,
            mpsc::{channel, Receiver},
        },
        time::Duration,
    };

    use app_core::backend::{request_stop, BackendEventLoop, BackendLink};

    fn state_with(transport: ScriptedTransport) -> (BackendAppState, Receiver<TransportEvent>) {
        let (tx, rx) = channel();
        (BackendAppState::new(Box::new(transport), tx), rx)
    }

    #[test]
    fn test_failed_connect_reports_error_then_closed() {
        let mut transport = ScriptedTransport::new(vec![]);
        transport.connect_result = Err("refused".into());
        let (mut state, rx) = state_with(transport);

        assert!(state.poll());
        assert_eq!(state.status(), ConnectionState::Closed);
        assert!(!state.poll());
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                TransportEvent::Error("refused".into()),
                TransportEvent::Closed
            ]
        );
    }

    #[test]
    fn test_messages_forwarded_in_order() {
        let transport = ScriptedTransport::new(vec![
            Ok(Incoming::Text("first".into())),
            Ok(Incoming::Idle),
            Ok(Incoming::Text("second".into())),
            Ok(Incoming::Closed),
        ]);
        let (mut state, rx) = state_with(transport);
        for _ in 0..6 {
            state.poll();
        }
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                TransportEvent::Opened,
                TransportEvent::Message("first".into()),
                TransportEvent::Message("second".into()),
                TransportEvent::Closed,
            ]
        );
    }

    #[test]
    fn test_read_error_closes_connection() {
        let transport = ScriptedTransport::new(vec![Err("reset".into())]);
        let (mut state, rx) = state_with(transport);
        state.poll();
        state.poll();
        assert_eq!(state.status(), ConnectionState::Closed);
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                TransportEvent::Opened,
                TransportEvent::Error("reset".into()),
                TransportEvent::Closed,
            ]
        );
    }

    #[test]
    fn test_send_requires_open_connection() {
        let (mut state, _rx) = state_with(ScriptedTransport::new(vec![]));
        assert!(state.send(&OutboundMessage::select_stream("EEG")).is_err());
        state.poll();
        assert!(state.send(&OutboundMessage::select_stream("EEG")).is_ok());
    }

    #[test]
    fn test_close_reaches_transport_once() {
        let transport = ScriptedTransport::new(vec![]);
        let closes = transport.closes.clone();
        let (mut state, rx) = state_with(transport);
        state.poll();
        state.close();
        state.close();
        state.shutdown();
        assert_eq!(closes.load(SeqCst), 1);
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![TransportEvent::Opened, TransportEvent::Closed]
        );
    }

    #[test]
    fn test_backend_loop_sends_selection_and_closes_on_stop() {
        let _ = env_logger::builder().is_test(true).try_init();

        let transport =
            ScriptedTransport::new(vec![Ok(Incoming::Text(r#"{"streams": []}"#.into()))]);
        let (sent, closes) = (transport.sent.clone(), transport.closes.clone());
        let (state, event_rx) = state_with(transport);

        let (request_tx, request_rx) = channel();
        let handle = BackendEventLoop::new(request_rx, state).run();

        // wait until the connection is open before sending
        assert_eq!(
            event_rx.recv_timeout(Duration::from_secs(5)),
            Ok(TransportEvent::Opened)
        );
        let msg = OutboundMessage::select_stream("EEG");
        let rx = BackendLink::dispatch(
            "send stream selection",
            move |b: &mut BackendEventLoop<BackendAppState>| b.state.send(&msg),
            &request_tx,
        )
        .unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(Ok(())));

        request_stop(&request_tx, handle);

        assert_eq!(
            sent.lock().unwrap().as_slice(),
            &[r#"{"stream_name":"EEG"}"#.to_string()]
        );
        assert_eq!(closes.load(SeqCst), 1);
        let rest: Vec<_> = event_rx.try_iter().collect();
        assert_eq!(
            rest,
            vec![
                TransportEvent::Message(r#"{"streams": []}"#.into()),
                TransportEvent::Closed
            ]
        );
    }
}
