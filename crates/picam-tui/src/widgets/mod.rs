pub mod field_input;
pub mod notice;
pub mod pane_chrome;
pub mod status_bar;
