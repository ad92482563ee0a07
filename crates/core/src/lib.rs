//! Population engine for standardized property-inspection forms.
//!
//! Takes a parsed inspection report and an HTML form template, and fills
//! the template in place: header identification fields, per-section line
//! items with statuses and findings, and the page-count footers. The
//! pipeline is lenient by design — individual items that cannot be mapped
//! or located are logged and skipped so one odd record never sinks a
//! whole report.

pub mod error;
mod format;
pub mod fuzzy;
pub mod header;
pub mod locate;
pub mod mapping;
pub mod populate;

pub use error::{ReportError, ReportResult};
pub use header::{format_inspection_date, populate_header};
pub use mapping::SlotDescriptor;
pub use populate::{finalize_page_numbers, populate_sections, remove_empty_sections, resolve_slot};
