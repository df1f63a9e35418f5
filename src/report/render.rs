//! # Report Renderer
//!
//! Writes report rows as an aligned text table or as CSV. Rows are written in
//! the order they arrive; the renderer never sorts.
//!
//! ```text
//! OBJ    DISPLAY_NAME                             APP_ID                                 SECRET_ID                              EXPIRY_DATE_TIME
//! App    billing-api                              0b6c...                                6f1e...                                2020-01-01 00:00
//! ```

use super::types::{Encoding, ReportRow};
use crate::constants::{
    APP_ID_COLUMN_WIDTH, DISPLAY_NAME_COLUMN_WIDTH, OBJ_COLUMN_WIDTH, REPORT_HEADER,
    SECRET_ID_COLUMN_WIDTH,
};
use owo_colors::OwoColorize;
use std::borrow::Cow;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    encoding: Encoding,
    /// Color the expiry of expired rows (text encoding only)
    highlight: bool,
}

impl ReportRenderer {
    #[must_use]
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            highlight: true,
        }
    }

    /// Disable terminal colors, e.g. when `NO_COLOR` is set
    #[must_use]
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Write the header followed by one line per row
    ///
    /// # Errors
    /// Propagates write errors from `out`.
    pub fn render<W: Write>(&self, rows: &[ReportRow], out: &mut W) -> io::Result<()> {
        let [obj, name, app_id, secret_id, expiry] = REPORT_HEADER;
        self.write_line(out, [obj, name, app_id, secret_id], expiry)?;

        let highlight = self.highlight && self.encoding == Encoding::Text;
        for row in rows {
            let expiry: Cow<'_, str> = if row.is_expired && highlight {
                Cow::Owned(row.expiry_display.red().to_string())
            } else {
                Cow::Borrowed(&row.expiry_display)
            };
            self.write_line(
                out,
                [
                    row.object_kind.as_str(),
                    &row.display_name,
                    &row.app_id,
                    &row.secret_id,
                ],
                &expiry,
            )?;
        }

        out.flush()
    }

    fn write_line<W: Write>(&self, out: &mut W, fields: [&str; 4], expiry: &str) -> io::Result<()> {
        let [obj, name, app_id, secret_id] = fields;
        match self.encoding {
            Encoding::Text => writeln!(
                out,
                "{obj:<w0$} {name:<w1$} {app_id:<w2$} {secret_id:<w3$} {expiry}",
                w0 = OBJ_COLUMN_WIDTH,
                w1 = DISPLAY_NAME_COLUMN_WIDTH,
                w2 = APP_ID_COLUMN_WIDTH,
                w3 = SECRET_ID_COLUMN_WIDTH,
            ),
            Encoding::Csv => writeln!(
                out,
                "{},{},{},{},{}",
                csv_field(obj),
                csv_field(name),
                csv_field(app_id),
                csv_field(secret_id),
                csv_field(expiry),
            ),
        }
    }
}

/// Wrap a CSV field in double quotes
///
/// Embedded quotes are written as-is; there is no escaping beyond quoting.
fn csv_field(value: &str) -> String {
    format!("\"{value}\"")
}
