use crate::visitor::VisitRecord;

/// Append-only log of visits
///
/// Implementations must make `record` atomic with respect to other calls:
/// every call appears exactly once and readers never see a partial append.
pub trait VisitStore: Send + Sync {
    /// Stamp the current time, append a visit, and return the new record
    fn record(&self, ip: String, country: String) -> VisitRecord;

    /// Snapshot of all retained visits, most recent first
    fn list_newest_first(&self) -> Vec<VisitRecord>;

    /// Number of retained visits
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
