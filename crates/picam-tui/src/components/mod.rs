pub mod config_form;
pub mod episode_list;
pub mod event_list;
pub mod header;
pub mod log_panel;
pub mod stats_panel;
pub mod stream_panel;
