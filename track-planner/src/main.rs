use std::process::ExitCode;

use tracing::{error, info};

use track_planner::cache::ScheduleCache;
use track_planner::config::ServerConfig;
use track_planner::logging;
use track_planner::planner::PlannerConfig;
use track_planner::timetable;
use track_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = ServerConfig::from_env();

    let timetable = match timetable::load_dir(&config.data_dir) {
        Ok(timetable) => timetable,
        Err(e) => {
            error!(data_dir = %config.data_dir.display(), error = %e, "failed to load timetable");
            return ExitCode::FAILURE;
        }
    };

    let cache = ScheduleCache::new(&config.cache_config());
    let state = AppState::new(timetable, PlannerConfig::default(), cache);
    let app = create_router(state);

    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!("track planner listening on http://{addr}");
    info!("  GET  /                 - Query form");
    info!("  GET  /train-schedule   - Plan a trip (start, end, departTime)");
    info!("  GET  /api/stations     - Station names");
    info!("  GET  /health           - Health check");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
