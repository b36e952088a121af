pub mod ports;
mod registry;

pub use registry::{SessionRegistry, SessionTable};
