pub mod board;
pub mod drag;
pub mod guard;
pub mod input;
