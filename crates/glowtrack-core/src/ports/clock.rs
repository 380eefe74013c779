//! Wall clock port.

use time::OffsetDateTime;

/// Source of the current instant and local timezone.
///
/// Injected so verification timestamps and day offsets are reproducible in tests.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;

    /// Returns the IANA name of the local timezone, e.g. `Europe/Berlin`.
    fn timezone(&self) -> String;
}
