//! Error taxonomy for the populate pipeline.
//!
//! Per-item anomalies (unmapped line items, unlocatable slots, malformed
//! dates, missing optional sub-objects) are absorbed where they occur with
//! skip-and-continue; only whole-document structural failures surface here.

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The template contains no section-title markers at all, so nothing can
    /// be populated. Callers should discard the document rather than present
    /// a half-filled one.
    #[error("template has no section-title markers")]
    MissingSectionMarkers,
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;
