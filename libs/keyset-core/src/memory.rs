//! In-process [`RangeScan`] over a snapshot of rows.
//!
//! Evaluates the same predicate and order model the SQL adapter translates,
//! which makes it the reference backend for ordering tests.

use async_trait::async_trait;

use crate::assembler::{RangeRequest, RangeScan};
use crate::error::Result;
use crate::order::compare_rows;
use crate::predicate::KeysetRow;

#[derive(Clone, Debug)]
pub struct MemoryScan<T> {
    rows: Vec<T>,
}

impl<T> Default for MemoryScan<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> MemoryScan<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }
}

impl<T> FromIterator<T> for MemoryScan<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl<T> RangeScan for MemoryScan<T>
where
    T: KeysetRow + Clone + Send + Sync,
{
    type Row = T;

    async fn scan(&self, req: &RangeRequest) -> Result<Vec<T>> {
        let filter = req.filter();
        let mut hits: Vec<&T> = self
            .rows
            .iter()
            .filter(|row| filter.as_ref().map_or(true, |p| p.matches(*row)))
            .collect();
        hits.sort_by(|a, b| compare_rows(&req.order, *a, *b));
        let limit = usize::try_from(req.limit).unwrap_or(usize::MAX);
        Ok(hits.into_iter().take(limit).cloned().collect())
    }
}
