//! Duplicate-tolerant batch insertion.

use std::future::Future;

use tracing::{debug, warn};

use crate::context::CallContext;
use crate::error::StoreError;

/// Insert `records` through `insert`, absorbing unique-key collisions.
///
/// One batch insert is attempted first. If the backend rejects it with a
/// duplicate-key error, each record is inserted on its own: a record that
/// collides again is already stored and contributes nothing, the rest are
/// collected. Any other failure, in either phase, fails the call.
///
/// Returns the rows the backend reports as newly inserted.
pub async fn insert_resilient<R, T, F, Fut>(
    ctx: &CallContext,
    records: &[R],
    mut insert: F,
) -> Result<Vec<T>, StoreError>
where
    F: FnMut(&[R]) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StoreError>>,
{
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let err = match insert(records).await {
        Ok(inserted) => return Ok(inserted),
        Err(err) if err.is_duplicate() => err,
        Err(err) => return Err(err),
    };

    if records.len() == 1 {
        debug!("Record already stored");
        return Ok(Vec::new());
    }

    warn!(
        batch_size = records.len(),
        error = %err,
        "Duplicate key in batch; inserting records one at a time"
    );

    let mut inserted = Vec::new();
    let mut already_stored = 0usize;
    for record in records {
        ctx.check()?;
        match insert(std::slice::from_ref(record)).await {
            Ok(rows) => inserted.extend(rows),
            Err(err) if err.is_duplicate() => already_stored += 1,
            Err(err) => return Err(err),
        }
    }

    debug!(
        inserted = inserted.len(),
        already_stored, "Per-record insert finished"
    );
    Ok(inserted)
}
