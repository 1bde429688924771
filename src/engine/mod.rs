pub mod config;
pub mod instance;
pub mod mask;
pub mod slide;
pub mod slot;
pub mod transition;
