mod plotter;
mod selector;

pub use plotter::Plotter;
pub use selector::Selector;
