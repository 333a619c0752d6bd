//! Input module
//!
//! Feeds text from a stream (stdin or a serial link) into the controller. The
//! reader runs on its own thread and only ever talks to the controller through
//! the event queue, so the controller keeps handling one event at a time.

pub mod line_reader;

pub use line_reader::LineReader;
