// Adapters layer: concrete payload sources and UI handles.

pub mod file;
pub mod http;
pub mod memory;
