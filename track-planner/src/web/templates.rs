//! Askama templates for the web frontend.

use askama::Template;
use chrono::{Datelike, NaiveDate};

use crate::domain::{DirectSolution, QueryResult, TransferSolution, format_duration};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with the query form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub stations: Vec<String>,
}

/// Query results.
#[derive(Template)]
#[template(path = "schedule.html")]
pub struct ScheduleTemplate {
    pub view: ScheduleView,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Month/day label shown next to each solution, e.g. "10月15日".
pub fn date_label(date: NaiveDate) -> String {
    format!("{}月{}日", date.month(), date.day())
}

/// One ride as shown on a card.
#[derive(Debug, Clone)]
pub struct LegView {
    pub train_name: String,
    pub from: String,
    pub to: String,
    pub depart: String,
    pub arrive: String,
    pub duration: String,
    /// Change note shown below the leg, absent on the last leg.
    pub change_after: Option<String>,
}

/// One solution card: a direct train or a transfer itinerary.
#[derive(Debug, Clone)]
pub struct SolutionView {
    pub is_direct: bool,
    pub title: String,
    pub badge: String,
    pub legs: Vec<LegView>,
    arrive_minutes: u32,
    first_leg_minutes: u32,
    total_minutes: u32,
}

impl SolutionView {
    pub fn from_direct(d: &DirectSolution) -> Self {
        Self {
            is_direct: true,
            title: d.train_name.clone(),
            badge: "直达".to_string(),
            legs: vec![LegView {
                train_name: d.train_name.clone(),
                from: d.start_station.clone(),
                to: d.end_station.clone(),
                depart: d.depart_time.to_string(),
                arrive: d.arrive_time.to_string(),
                duration: format_duration(d.duration_minutes),
                change_after: None,
            }],
            arrive_minutes: d.arrive_time.minutes(),
            first_leg_minutes: d.duration_minutes,
            total_minutes: d.duration_minutes,
        }
    }

    pub fn from_transfer(t: &TransferSolution) -> Self {
        let changes = t.change_count();
        let label = if changes == 1 {
            "中转".to_string()
        } else {
            format!("{changes}次中转")
        };

        let legs = t
            .legs
            .iter()
            .enumerate()
            .map(|(i, leg)| LegView {
                train_name: leg.train_name.clone(),
                from: leg.from_station.clone(),
                to: leg.to_station.clone(),
                depart: leg.depart_time.to_string(),
                arrive: leg.arrive_time.to_string(),
                duration: format_duration(leg.duration_minutes),
                change_after: t
                    .transfer_stations
                    .get(i)
                    .zip(t.wait_minutes.get(i))
                    .map(|(station, wait)| format!("在 {station} 中转时间 {}", format_duration(*wait))),
            })
            .collect();

        Self {
            is_direct: false,
            title: String::new(),
            badge: format!("{label} · 总用时 {}", format_duration(t.total_minutes)),
            legs,
            arrive_minutes: t.arrive_time().map_or(0, |a| a.minutes()),
            first_leg_minutes: t.legs.first().map_or(t.total_minutes, |l| l.duration_minutes),
            total_minutes: t.total_minutes,
        }
    }
}

/// Everything the results page shows.
#[derive(Debug, Clone)]
pub struct ScheduleView {
    pub start: String,
    pub end: String,
    pub depart_time: Option<String>,
    pub date_label: String,
    pub solutions: Vec<SolutionView>,
}

impl ScheduleView {
    /// Merge direct and transfer solutions into one list ordered by
    /// arrival time of day, then first-leg duration, then total duration.
    /// Transfer cards are numbered in that order.
    pub fn new(result: &QueryResult, date: NaiveDate) -> Self {
        let mut solutions: Vec<SolutionView> = result
            .direct
            .iter()
            .map(SolutionView::from_direct)
            .chain(result.transfers.iter().map(SolutionView::from_transfer))
            .collect();

        solutions.sort_by_key(|s| (s.arrive_minutes, s.first_leg_minutes, s.total_minutes));

        for (i, s) in solutions.iter_mut().enumerate() {
            if !s.is_direct {
                s.title = format!("方案 {}", i + 1);
            }
        }

        Self {
            start: result.start.clone(),
            end: result.end.clone(),
            depart_time: result.depart_time.map(|t| t.to_string()),
            date_label: date_label(date),
            solutions,
        }
    }
}
