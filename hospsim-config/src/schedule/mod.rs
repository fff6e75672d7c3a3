pub mod types;
pub mod slot_utils;
pub mod floors;
pub mod derive;
pub mod draft;
pub mod fleet;

pub use types::Breakpoint;
pub use derive::{derive_time_ranges, label_ranges, LabelledRange};
pub use draft::{DraftEdit, ScheduleDraft};
