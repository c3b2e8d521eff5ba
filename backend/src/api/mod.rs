pub mod analysis;
pub mod pages;

pub use analysis::*;
pub use pages::*;
