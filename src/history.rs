use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::command::OpKind;

/// status string recorded when a GET or DEL targets a key the server does not have
pub const STATUS_NOT_FOUND: &str = "Not Found";

/// status string recorded when a DEL actually removed a key
pub const STATUS_DELETED: &str = "Deleted";

/// One executed operation, as shown in the presentation layer's history table.
///
/// Records are immutable once appended: the log hands out shared references and
/// never rewrites an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    /// when the operation finished, in seconds since the unix epoch.
    /// Informational only; ordering comes from the log's insertion order.
    pub timestamp: u64,
    /// which operation ran
    pub operation: OpKind,
    /// the key the operation targeted
    pub key: String,
    /// the value involved, or an outcome status such as
    /// [`STATUS_NOT_FOUND`] / [`STATUS_DELETED`]
    pub value: String,
}

impl HistoryRecord {
    /// builds a record stamped with the current wall-clock time
    pub fn new(operation: OpKind, key: &str, value: &str) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        HistoryRecord {
            timestamp,
            operation,
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// An append-only, insertion-ordered log of executed operations.
///
/// Insertion order is the only ordering guarantee. Clearing the log is
/// independent of clearing the mirror; [`Session`](crate::Session) wires the two
/// together only for its "clear database" operation.
#[derive(Debug, Default)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    /// creates an empty log
    pub fn new() -> Self {
        HistoryLog::default()
    }

    /// appends `record` at the end of the log
    pub fn append(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    /// the records in insertion order
    pub fn snapshot(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// number of records in the log
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// true if the log holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// removes every record
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_insertion_order() {
        let mut log = HistoryLog::new();
        log.append(HistoryRecord::new(OpKind::Set, "a", "1"));
        log.append(HistoryRecord::new(OpKind::Get, "a", "1"));
        log.append(HistoryRecord::new(OpKind::Del, "a", STATUS_DELETED));

        let ops: Vec<_> = log.snapshot().iter().map(|r| r.operation).collect();
        assert_eq!(ops, vec![OpKind::Set, OpKind::Get, OpKind::Del]);
    }

    #[test]
    fn appended_records_never_change() {
        let mut log = HistoryLog::new();
        log.append(HistoryRecord::new(OpKind::Set, "a", "1"));
        let first = log.snapshot()[0].clone();

        log.append(HistoryRecord::new(OpKind::Set, "b", "2"));
        log.append(HistoryRecord::new(OpKind::Del, "a", STATUS_DELETED));
        assert_eq!(log.snapshot()[0], first);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = HistoryLog::new();
        log.append(HistoryRecord::new(OpKind::Get, "x", STATUS_NOT_FOUND));
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(log.is_empty());
    }
}
