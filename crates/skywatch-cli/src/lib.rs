//! Shared pieces of the skywatch binaries: the monthly JSON log store and
//! the analysis report renderer.

pub mod report;
pub mod store;

pub use report::render_report;
pub use store::MonthlyLog;
