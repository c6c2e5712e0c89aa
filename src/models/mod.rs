pub mod quote;
pub mod watch;

pub use quote::Quote;
pub use watch::{Direction, TokenWatch};
