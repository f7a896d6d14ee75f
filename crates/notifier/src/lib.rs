//! Report rendering and outbound notification delivery.

pub mod email;
pub mod report;

pub use email::EmailNotifier;
pub use report::{build_report, Report, ReportInput};
