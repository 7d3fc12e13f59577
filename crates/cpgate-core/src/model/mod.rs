// ── Domain model ──

pub mod gateway;

pub use gateway::{CLONE_SUFFIX, EditableField, Gateway, NetworkInterface};
