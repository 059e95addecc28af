pub mod config;
pub mod suggest;
pub mod typing;
