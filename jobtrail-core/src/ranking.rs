//! Ordering of application lists

use crate::{
    date::{sort_value, UNDATED},
    record::ApplicationRecord,
};
use std::cmp::{Ordering, Reverse};

/// Order records for display.
///
/// Answered first, then no-answer, then rejected. Within a status the most
/// recent canonical date comes first and records without a canonical date
/// come last. The sort is stable, so exact ties keep their input order.
///
/// Returns a new list; `records` is left as it is.
pub fn rank(records: &[ApplicationRecord]) -> Vec<ApplicationRecord> {
    rank_owned(records.to_vec())
}

/// Like [`rank`], for a list the caller already owns.
pub fn rank_owned(mut records: Vec<ApplicationRecord>) -> Vec<ApplicationRecord> {
    records.sort_by(compare);
    records
}

/// The comparator behind [`rank`].
pub fn compare(a: &ApplicationRecord, b: &ApplicationRecord) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

fn sort_key(record: &ApplicationRecord) -> (u8, bool, Reverse<u64>) {
    let date = sort_value(&record.date);
    (record.status.rank(), date == UNDATED, Reverse(date))
}
