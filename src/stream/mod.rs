//! Turn streaming: the event pump, the live stream, and the buffered fold.

pub mod session;
pub mod turn;

pub use session::EventReader;
pub use turn::{StreamedTurn, Turn};
