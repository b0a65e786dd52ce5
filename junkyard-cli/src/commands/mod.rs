//! Command handlers -- one module per subcommand

pub mod add;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod decode;
pub mod delete;
pub mod list;
pub mod part_status;
pub mod scan;
