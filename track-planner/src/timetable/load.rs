//! Loading the timetable from its data directory.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::domain::{Station, StationId, StopEvent, Track, TrackId, TrainRun, parse_stop_time};

use super::Timetable;
use super::error::LoadError;
use super::files::{TRACK_INDEX_FILE, TrackFile, TrackIndexFile, TrackInfoDto, track_file_name};

/// Load every line listed in `SingleCityTrack.json` under `data_dir`.
///
/// Fails on the first unreadable or malformed file. Individual stop times
/// that are missing or unparsable do not fail the load; they become
/// non-stopping events.
pub fn load_dir(data_dir: &Path) -> Result<Timetable, LoadError> {
    let index: TrackIndexFile = read_json(&data_dir.join(TRACK_INDEX_FILE))?;

    let infos: Vec<&TrackInfoDto> = index.body.iter().flat_map(|g| g.list.iter()).collect();

    let mut tracks = Vec::with_capacity(infos.len());
    for info in infos {
        let path = data_dir.join(track_file_name(info.city_track_id));
        let file: TrackFile = read_json(&path)?;
        let track = track_from_file(info, file);
        debug!(
            track = %track.id(),
            stations = track.stations().len(),
            runs = track.runs().len(),
            "loaded track"
        );
        tracks.push(track);
    }

    let timetable = Timetable::new(tracks);
    info!(
        tracks = timetable.track_count(),
        stations = timetable.station_names().len(),
        "timetable loaded"
    );
    Ok(timetable)
}

/// Convert one line's file into a `Track`.
pub fn track_from_file(info: &TrackInfoDto, file: TrackFile) -> Track {
    let stations = file
        .body
        .station_list
        .into_iter()
        .map(|s| Station::new(StationId(s.station_id), s.station_name, s.station_position))
        .collect();

    let runs = file
        .body
        .train_time_list
        .into_iter()
        .map(|tt| {
            let stops = tt
                .station_arrive_time_list
                .into_iter()
                .map(|rec| {
                    let time = rec.arrive_time.as_deref().and_then(parse_stop_time);
                    StopEvent::new(StationId(rec.station_id), time)
                })
                .collect();
            TrainRun::new(tt.train_number.name.unwrap_or_default(), stops)
        })
        .collect();

    Track::new(
        TrackId(info.city_track_id),
        info.track_name.clone(),
        stations,
        runs,
    )
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Json {
        path: PathBuf::from(path),
        source,
    })
}
