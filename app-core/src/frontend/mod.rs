mod listeners;

pub use listeners::{GlobalListeners, Subscription};
