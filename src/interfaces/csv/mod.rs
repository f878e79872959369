//! CSV input and output used by the command line.

pub mod request_reader;
pub mod schedule_writer;
pub mod summary_writer;
