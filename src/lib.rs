pub mod catalog;
pub mod detector;
pub mod hotkey;
pub mod logging;
pub mod overlay;
pub mod presenter;
pub mod settings;
