//! PDF parsing: the lopdf-backed backend and the pure reading-order
//! reconstruction that runs on top of it.

pub mod backend;
pub mod layout;
