//! Built-in leaf transformations

mod label;
mod noop;
mod rename;
mod replace;

pub use label::MapLabel;
pub use noop::IntentionalNoop;
pub use rename::Move;
pub use replace::Replace;
