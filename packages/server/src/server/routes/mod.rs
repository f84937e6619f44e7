// HTTP routes
pub mod extracted;
pub mod health;

pub use extracted::*;
pub use health::*;
