pub mod cli;
pub mod script;
