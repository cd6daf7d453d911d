//! CLI command modules

pub mod analyze;
pub mod info;
pub mod init;
pub mod resolve;
pub mod scan;
pub mod validate;
