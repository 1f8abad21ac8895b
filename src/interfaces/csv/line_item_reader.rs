use crate::domain::sheet::{AmountControl, LineItem};
use crate::error::{Result, WalletError};
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// Short rows are padded with empty fields, so the optional columns must
/// read an empty field as absent.
#[derive(Debug, Deserialize)]
struct LineItemRecord {
    id: String,
    label: String,
    amount: Decimal,
    pending: Option<bool>,
    display_text: Option<String>,
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            amount: record.amount,
            pending: record.pending.unwrap_or(false),
            display_text: record.display_text.filter(|text| !text.is_empty()),
        }
    }
}

/// Reads sheet line items from a CSV source with an
/// `id, label, amount, pending, display_text` header.
///
/// The last two columns are optional.
pub struct LineItemReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> LineItemReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn line_items(mut self) -> impl Iterator<Item = Result<LineItem>> {
        let (headers, header_error) = match self.reader.headers() {
            Ok(headers) => (headers.clone(), None),
            Err(e) => (StringRecord::new(), Some(WalletError::from(e))),
        };

        header_error.into_iter().map(Err).chain(
            self.reader
                .into_records()
                .map(move |record| -> Result<LineItem> {
                    let mut record = record?;
                    while record.len() < headers.len() {
                        record.push_field("");
                    }
                    let row: LineItemRecord = record.deserialize(Some(&headers))?;
                    Ok(row.into())
                }),
        )
    }

    /// Collects every row into a single amount control, failing on the first bad row.
    pub fn into_amount_control(
        self,
        id: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<AmountControl> {
        let mut control = AmountControl::new(id, currency);
        for item in self.line_items() {
            control.add_item(item?)?;
        }
        Ok(control)
    }
}
