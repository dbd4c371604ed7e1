pub mod csv;

pub use self::csv::{read_report, write_report, write_report_to_path, ExportError, CSV_HEADER};
