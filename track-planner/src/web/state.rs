//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::ScheduleCache;
use crate::planner::PlannerConfig;
use crate::timetable::Timetable;

/// Shared application state.
///
/// The timetable is loaded once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Loaded timetable
    pub timetable: Arc<Timetable>,

    /// Planner limits
    pub config: Arc<PlannerConfig>,

    /// Memory and disk schedule cache
    pub cache: Arc<ScheduleCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(timetable: Timetable, config: PlannerConfig, cache: ScheduleCache) -> Self {
        Self {
            timetable: Arc::new(timetable),
            config: Arc::new(config),
            cache: Arc::new(cache),
        }
    }
}
