pub mod deadline;
pub mod profile;
pub mod report;

pub use deadline::Deadline;
pub use profile::*;
pub use report::LoadReport;
