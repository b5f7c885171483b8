pub mod appconfig;

pub use appconfig::*;
