pub mod entity;
pub mod format;
