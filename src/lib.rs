pub mod error;
pub mod expand;
pub mod flags;
pub mod shell;

pub mod core;
pub mod highlight;
pub mod parser;
pub mod process;
