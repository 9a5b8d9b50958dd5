pub mod domain;
pub mod standings;
pub mod prelude;

pub use standings::*;
