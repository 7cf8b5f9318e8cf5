use crate::error::{Result, SeederError};
use crate::types::RawRow;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Decoded CSV export: the header row plus a lazy cursor over the data rows.
///
/// The cursor is single-pass; re-reading means calling [`read_rows`] again.
pub struct CsvRows<'a> {
    headers: Vec<String>,
    records: csv::ByteRecordsIntoIter<&'a [u8]>,
}

impl<'a> CsvRows<'a> {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<'a> Iterator for CsvRows<'a> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(SeederError::from(e))),
        };
        if std::str::from_utf8(record.as_slice()).is_err() {
            warn!(
                "Row at line {} is not valid UTF-8, replacing bad bytes",
                record.position().map_or(0, |p| p.line())
            );
        }
        Some(Ok(decode_fields(&record)))
    }
}

/// Invalid UTF-8 sequences become U+FFFD instead of failing the row.
fn decode_fields(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

/// Decodes `bytes` as comma-separated text and consumes the header row.
///
/// Rows may have any number of fields; short rows are left for the
/// normalizer to drop. Only an input without a header row, or one the
/// tokenizer rejects, is malformed.
pub fn read_rows(bytes: &[u8]) -> Result<CsvRows<'_>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = decode_fields(reader.byte_headers()?);
    if headers.is_empty() {
        return Err(SeederError::MalformedInput("source has no header row".into()));
    }
    debug!("CSV headers: {:?}", headers);

    Ok(CsvRows {
        headers,
        records: reader.into_byte_records(),
    })
}
