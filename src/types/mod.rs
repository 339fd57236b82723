pub mod indicators;
pub mod market;
pub mod news;
pub mod prediction;
pub mod price;

pub use indicators::*;
pub use market::*;
pub use news::*;
pub use prediction::*;
pub use price::*;
