mod backend_link;
mod eventloop;

pub use self::{
    backend_link::{BackendLink, BackendRequest, LinkReceiver},
    eventloop::{request_stop, BackendEventLoop, DynRequestSender},
};

/// State owned by the backend thread.
///
/// Besides answering requests, a state may have work of its own to do on
/// every loop iteration (e.g. reading from a socket) and resources to release
/// when the loop ends.
pub trait BackendState {
    /// Called once per loop iteration, after all pending requests were
    /// handled. Returns `true` if any work was done.
    fn poll(&mut self) -> bool {
        false
    }

    /// Called exactly once, after the event loop stopped.
    fn shutdown(&mut self) {}
}
