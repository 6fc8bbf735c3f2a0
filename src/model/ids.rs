use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Issues the next id from the process-wide counter. Ids are never reused;
/// students, subjects, records and batch events all draw from this namespace.
pub fn next_id() -> u64 {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub fn fresh() -> Self {
                Self(next_id())
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(StudentId);
id_type!(SubjectId);
id_type!(
    /// Identity of a single attendance or assessment record.
    RecordId
);
id_type!(
    /// Shared by every per-student record created in one roster-wide call.
    EventId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase_across_kinds() {
        let a = StudentId::fresh().get();
        let b = SubjectId::fresh().get();
        let c = EventId::fresh().get();
        let d = RecordId::fresh().get();
        assert!(a < b && b < c && c < d);
    }
}
