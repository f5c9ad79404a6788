mod client;
mod event;
mod goal;
mod progress;
mod smart_log;
mod trigger;

pub use client::*;
pub use event::*;
pub use goal::*;
pub use progress::*;
pub use smart_log::*;
pub use trigger::*;
