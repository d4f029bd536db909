mod ui;

/// Stream combo box and channel checklist.
#[derive(Default)]
pub struct Selector {
    /// Working copy of the selected stream, edited by the combo box.
    stream_buffer: String,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }
}
