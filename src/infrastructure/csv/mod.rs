// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Line splitting and full-text parsing into domain tables

mod line_splitter;
mod table_parser;

pub use line_splitter::split_csv_line;
pub use table_parser::{canonical_header, parse_csv_text, read_csv_text};
