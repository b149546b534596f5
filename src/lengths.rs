//! Item-length statistics of a dataset

use crate::error::Result;
use crate::record::{item_length, open_dataset};
use serde::Serialize;
use std::io::BufRead;
use std::path::Path;

/// Average and maximum item-length over all records (duplicates included)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthStats {
    pub dataset_size: u64,
    pub average_item_length: f64,
    pub max_item_length: u64,
}

impl LengthStats {
    /// One pass over `reader`; an empty dataset has average 0
    pub fn scan<R: BufRead>(reader: R) -> Result<Self> {
        let mut dataset_size = 0u64;
        let mut total = 0u64;
        let mut max_item_length = 0u64;

        for line in reader.lines() {
            let line = line?;
            dataset_size += 1;
            let length = item_length(&line, dataset_size)? as u64;
            total += length;
            max_item_length = max_item_length.max(length);
        }

        let average_item_length = if dataset_size == 0 {
            0.0
        } else {
            total as f64 / dataset_size as f64
        };

        Ok(Self {
            dataset_size,
            average_item_length,
            max_item_length,
        })
    }

    pub fn from_path(dataset: &Path) -> Result<Self> {
        Self::scan(open_dataset(dataset)?)
    }
}
