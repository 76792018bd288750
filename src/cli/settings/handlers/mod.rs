//! Setting handlers for different configuration patterns.

pub mod boolean;
pub mod remote;
pub mod simple;

pub use boolean::*;
pub use remote::*;
pub use simple::*;
