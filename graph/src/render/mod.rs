pub mod ansi;
pub mod segment;
pub mod viewport;

pub use ansi::{lines, Line, Lines};
pub use segment::{Background, Segment};
pub use viewport::Viewport;
