use std::io::{self, Write};

use crate::genome::{MapRecord, MAP_HEADER};

/// Write the host↔reference map file: header line, then one line per block.
pub fn write_map<W: Write>(writer: &mut W, records: &[MapRecord]) -> io::Result<()> {
    writeln!(writer, "{MAP_HEADER}")?;
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writer.flush()
}
