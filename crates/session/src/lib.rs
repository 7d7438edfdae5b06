pub mod editor;
pub mod session;

pub use editor::{Editor, Frame};
pub use session::{SessionCmd, SessionHandle, open};
