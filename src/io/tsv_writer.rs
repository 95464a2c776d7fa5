use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::archive::DnaMoleculeArchive;
use crate::segments::SegmentColumn;
use crate::table::DataTable;

/// One row per segment of every attached table.
pub fn write_segments_tsv(
    path: &Path,
    archive: &DnaMoleculeArchive,
    column: SegmentColumn,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(
        w,
        "uid\tprefix\tx_column\ty_column\tregion\ttype\tindex\tX1\tX2\tY1\tY2\tA\tSigma_A\tB\tSigma_B\t{}",
        column.pause_column()
    )?;
    for molecule in &archive.molecules {
        for table in &molecule.segment_tables {
            for (index, s) in table.rows().iter().enumerate() {
                let pause = match s.pause(column) {
                    Some(true) => "true",
                    Some(false) => "false",
                    None => "",
                };
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{}",
                    molecule.uid(),
                    table.prefix(),
                    table.x_column(),
                    table.y_column(),
                    table.region(),
                    table.kind().as_str(),
                    index,
                    s.x1,
                    s.x2,
                    s.y1,
                    s.y2,
                    s.a,
                    s.sigma_a,
                    s.b,
                    s.sigma_b,
                    pause
                )?;
            }
        }
    }
    Ok(())
}

/// Writes a raw table with a leading dense `index` column.
pub fn write_table_tsv(path: &Path, table: &DataTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let mut header = String::from("index");
    for name in table.column_names() {
        header.push('\t');
        header.push_str(name);
    }
    writeln!(w, "{}", header)?;

    for i in 0..table.n_rows() {
        let row = table
            .row(i)
            .with_context(|| format!("row {} out of range", i))?;
        let mut line = i.to_string();
        for v in row {
            line.push('\t');
            line.push_str(&format!("{}", v));
        }
        writeln!(w, "{}", line)?;
    }
    Ok(())
}
