use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use anyhow::Result;
use flate2::read::GzDecoder;

use crate::schema::v1::TrajectoryReportV1;

pub mod describe;
pub mod json_writer;
pub mod summary;
pub mod tsv_writer;

pub fn write_json(path: &Path, report: &TrajectoryReportV1) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub(crate) fn open_maybe_gz(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(decoder))
    } else {
        Ok(Box::new(file))
    }
}
