pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod interchange;
pub mod prelude;
pub mod storage;
