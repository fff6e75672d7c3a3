pub mod validation;
pub mod export;

pub use validation::{resolve_speed, validate_special_type_name, validate_window_settings};
pub use export::{export_rows_to_file, export_spreadsheet, SpreadsheetFormat};
