#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod backend_state;
mod frame;
mod protocol;

pub use app::{Config, EguiApp};
pub use backend_state::{BackendAppState, Transport, WsTransport};
