use super::NgramTable;
use crate::error::CfResult;
use std::io::Read;
use tracing::debug;

/// Reads an `ngram<TAB>count` file into a table of the given order.
///
/// Header lines, keys of another length and unparsable counts are skipped,
/// so a single file holding mixed 1/2/3-gram sections can be loaded once per
/// order.
pub fn load_table<R: Read>(reader: R, order: usize) -> CfResult<NgramTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut lines_read = 0;
    let mut skipped = 0;

    for result in rdr.records() {
        lines_read += 1;
        let Ok(rec) = result else {
            skipped += 1;
            continue;
        };
        if rec.len() < 2 {
            skipped += 1;
            continue;
        }

        let key = rec[0].trim();
        if key.is_empty() || key.chars().count() != order {
            skipped += 1;
            continue;
        }

        match rec[1].trim().parse::<f64>() {
            Ok(count) => rows.push((key.to_string(), count)),
            Err(_) => skipped += 1,
        }
    }

    let table = NgramTable::from_counts(order, rows);
    debug!(
        "Scanned {} lines, loaded {} {}-grams ({} skipped)",
        lines_read,
        table.len(),
        order,
        skipped
    );
    Ok(table)
}
