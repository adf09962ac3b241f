#[macro_use]
extern crate log;

pub mod error;
pub mod file;
pub mod token;
pub mod ty;
