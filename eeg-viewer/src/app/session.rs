use std::{
    sync::mpsc::{channel, Receiver, TryRecvError},
    thread::JoinHandle,
};

use app_core::{
    backend::{request_stop, BackendEventLoop, BackendLink, DynRequestSender, LinkReceiver},
    frontend::{GlobalListeners, Subscription},
};
use egui::Pos2;

use super::{
    events::{self, EventQueue, PointerPressed},
    state::ViewerState,
};
use crate::{
    backend_state::{BackendAppState, Transport, TransportEvent},
    protocol::OutboundMessage,
};

/// One connection to the stream server together with the state it feeds.
///
/// Starting a session spawns the backend loop owning the transport and
/// subscribes to pointer presses; `teardown` undoes both.
pub struct ViewerSession {
    pub state: ViewerState,
    pub(crate) event_queue: EventQueue,
    request_tx: DynRequestSender<BackendAppState>,
    transport_rx: Receiver<TransportEvent>,
    backend_thread_handle: Option<JoinHandle<()>>,
    pointer_subscription: Option<Subscription<Pos2>>,
    pending_sends: Vec<LinkReceiver<Result<(), String>>>,
}

impl ViewerSession {
    pub fn start(
        transport: Box<dyn Transport>,
        pointer_listeners: &mut GlobalListeners<Pos2>,
    ) -> Self {
        let (event_tx, transport_rx) = channel();
        let (request_tx, request_rx) = channel();
        let backend_state = BackendAppState::new(transport, event_tx);
        let handle = BackendEventLoop::new(request_rx, backend_state).run();

        Self {
            state: ViewerState::new(),
            event_queue: EventQueue::new(),
            request_tx,
            transport_rx,
            backend_thread_handle: Some(handle),
            pointer_subscription: Some(
                pointer_listeners.subscribe("channel panel outside click"),
            ),
            pending_sends: Vec::new(),
        }
    }

    /// Bring the state up to date with everything that happened since the
    /// last call. Returns whether anything changed.
    pub fn update(&mut self) -> bool {
        loop {
            match self.transport_rx.try_recv() {
                Ok(event) => self.event_queue.queue_event(events::from_transport(event)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.backend_thread_handle.is_some() {
                        log::debug!("backend stopped sending transport events");
                    }
                    break;
                }
            }
        }
        if let Some(subscription) = &self.pointer_subscription {
            for pos in subscription.drain() {
                self.event_queue
                    .queue_event(Box::new(PointerPressed::new(pos)));
            }
        }

        let changed = !self.event_queue.is_empty();
        self.event_queue.run(&mut self.state);

        for msg in self.state.take_outbox() {
            self.send(msg);
        }
        self.poll_pending_sends();
        changed
    }

    fn send(&mut self, msg: OutboundMessage) {
        let description = format!("send selection of stream '{}'", msg.stream_name);
        match BackendLink::dispatch(
            &description,
            move |b: &mut BackendEventLoop<BackendAppState>| b.state.send(&msg),
            &self.request_tx,
        ) {
            Ok(rx) => self.pending_sends.push(rx),
            Err(err) => log::error!("{description}: {err}"),
        }
    }

    fn poll_pending_sends(&mut self) {
        self.pending_sends.retain(|rx| match rx.try_recv() {
            Ok(Ok(())) => false,
            Ok(Err(err)) => {
                log::error!("{err}");
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                log::warn!("backend dropped a send request");
                false
            }
        });
    }

    /// Unsubscribe from pointer presses and stop the backend, which closes
    /// the transport. Calling this more than once has no further effect.
    pub fn teardown(&mut self) {
        if self.pointer_subscription.take().is_some() {
            log::debug!("removed pointer listener");
        }
        if let Some(handle) = self.backend_thread_handle.take() {
            request_stop(&self.request_tx, handle);
        }
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
