pub mod aggregation;
pub mod assembler;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod projections;
pub mod service;

pub use assembler::ChartKind;
pub use dataset::{Dataset, Record};
pub use error::{DashboardError, DashboardResult};
pub use filter::{FilterSpec, FilteredView, YearRange};
pub use service::DashboardContext;
