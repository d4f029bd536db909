use std::collections::VecDeque;

pub trait AppEvent {
    type App;
    fn apply(&mut self, app: &mut Self::App) -> Result<(), String>;
    fn describe(&self) -> &str;
}

/// The EventQueue stores events that are processed each iteration
/// of the application GUI event loop.
///
/// Events are applied strictly in the order they were queued.
pub struct EventQueue<App> {
    queue: VecDeque<Box<dyn AppEvent<App = App>>>,
}

impl<App> Default for EventQueue<App> {
    fn default() -> Self {
        Self::new()
    }
}

impl<App> EventQueue<App> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn queue_event(&mut self, event: Box<dyn AppEvent<App = App>>) {
        self.queue.push_back(event);
    }

    pub fn discard_events(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Fully drain the queue, applying every event to `app`.
    ///
    /// Returns the number of events that were applied successfully. Failed
    /// events are logged and dropped.
    pub fn run(&mut self, app: &mut App) -> usize {
        let mut applied = 0;
        while let Some(mut event) = self.queue.pop_front() {
            match event.apply(app) {
                Ok(()) => applied += 1,
                Err(err) => log::error!("event '{}' failed: {}", event.describe(), err),
            }
        }
        applied
    }
}
