//! Command implementations
//!
//! Every user-facing command is an async method on `Repository`, grouped
//! by topic under `porcelain`.

pub mod porcelain;
