//! Sink implementations

mod host_file;

pub use self::host_file::HostFileSink;
