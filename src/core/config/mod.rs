pub mod data;
pub mod defaults;
pub mod io;

pub use data::{Config, RemoteConfig};
pub use io::ConfigError;
