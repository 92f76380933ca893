//! Excel出力（CLI版）

use crate::error::{MinamError, Result};
use minam_common::export::excel_core::generate_report_buffer;
use minam_common::{ParsedDataset, RelationshipEvidence};

pub fn generate_report(datasets: &[ParsedDataset], connections: &[RelationshipEvidence]) -> Result<Vec<u8>> {
    generate_report_buffer(datasets, connections).map_err(|e| MinamError::Export(e.to_string()))
}
