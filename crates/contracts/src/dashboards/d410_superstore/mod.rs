pub mod chart;
pub mod dto;

pub use chart::*;
pub use dto::*;
