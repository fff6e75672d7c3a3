//! Outpatient lab: inspection windows, special patient types and their ratios.

pub mod ratios;
pub mod special_types;
pub mod windows;
pub mod persist;

pub use special_types::SpecialWindowType;
pub use windows::WindowSettings;
