use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "picam",
    version,
    about = "Terminal dashboard for a motion-detecting camera backend"
)]
pub struct Cli {
    /// Backend base URL, overrides `server.base_url` from the config file.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Read configuration from this file instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
