//! Refresh the timetable data directory from the metro API.
//!
//! Needs `METRO_API_TOKEN`; `METRO_API_BASE` and `DATA_DIR` are optional.

use std::process::ExitCode;

use tracing::{error, info};

use track_planner::config::ServerConfig;
use track_planner::fetch::{self, FetchConfig, MetroClient};
use track_planner::logging;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let Some(fetch_config) = FetchConfig::from_env() else {
        error!("METRO_API_TOKEN not set");
        return ExitCode::FAILURE;
    };
    let data_dir = ServerConfig::from_env().data_dir;

    let client = match MetroClient::new(&fetch_config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create API client");
            return ExitCode::FAILURE;
        }
    };

    match fetch::refresh(&client, &fetch_config, &data_dir).await {
        Ok(summary) => {
            info!(
                tracks = summary.tracks,
                files = summary.files.len(),
                data_dir = %data_dir.display(),
                "all data files updated"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "error updating data");
            ExitCode::FAILURE
        }
    }
}
