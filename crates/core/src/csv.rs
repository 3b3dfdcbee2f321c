//! CSV rendering for admin exports.
//!
//! Output format: UTF-8 with a byte-order mark, comma-separated, and every
//! field double-quoted with embedded quotes doubled. Each resource exports a
//! fixed header row followed by its data rows.

/// UTF-8 byte-order mark emitted at the start of every export.
pub const UTF8_BOM: &str = "\u{feff}";

/// Incremental CSV document builder.
///
/// ```
/// use lingua_core::csv::CsvBuilder;
///
/// let mut csv = CsvBuilder::new(&["id", "name"]);
/// csv.row(&["1", "Ann \"Lexi\" Lee"]);
/// let out = csv.finish();
/// assert!(out.ends_with("\"1\",\"Ann \"\"Lexi\"\" Lee\"\r\n"));
/// ```
pub struct CsvBuilder {
    buf: String,
}

impl CsvBuilder {
    /// Start a document with the given header row (written immediately,
    /// after the BOM).
    pub fn new(headers: &[&str]) -> Self {
        let mut builder = Self {
            buf: String::from(UTF8_BOM),
        };
        builder.row_impl(headers.iter().copied());
        builder
    }

    /// Append one data row. Every field is quoted.
    pub fn row(&mut self, fields: &[&str]) {
        self.row_impl(fields.iter().copied());
    }

    /// Append one data row from owned strings.
    pub fn row_owned(&mut self, fields: &[String]) {
        self.row_impl(fields.iter().map(String::as_str));
    }

    fn row_impl<'a>(&mut self, fields: impl Iterator<Item = &'a str>) {
        let mut first = true;
        for field in fields {
            if !first {
                self.buf.push(',');
            }
            first = false;
            self.buf.push('"');
            for c in field.chars() {
                if c == '"' {
                    self.buf.push('"');
                }
                self.buf.push(c);
            }
            self.buf.push('"');
        }
        self.buf.push_str("\r\n");
    }

    /// Consume the builder, returning the full document.
    pub fn finish(self) -> String {
        self.buf
    }
}
