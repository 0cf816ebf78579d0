//! Refreshing the timetable data directory from the metro API.
//!
//! The line list is fetched first and written to `SingleCityTrack.json`.
//! Each listed line's timetable is then fetched with bounded concurrency
//! and a pause after every request, and written to `{cityTrackId}.json`.
//! Responses pass through the data-file types, so fields the loader does
//! not read are dropped on the way.

mod client;
mod error;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::info;

use crate::timetable::files::{TRACK_INDEX_FILE, TrackIndexFile, track_file_name};

pub use client::{DEFAULT_BASE_URL, FetchConfig, MetroClient, parse_body};
pub use error::FetchError;

/// What a refresh wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub tracks: usize,
    pub files: Vec<PathBuf>,
}

/// Fetch everything and rewrite the data directory.
///
/// Stops at the first failure; files written before it are left in place.
pub async fn refresh(
    client: &MetroClient,
    config: &FetchConfig,
    data_dir: &Path,
) -> Result<RefreshSummary, FetchError> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|source| FetchError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;

    let index = client.fetch_track_index().await?;
    let index_path = data_dir.join(TRACK_INDEX_FILE);
    write_json(&index_path, &index).await?;
    info!(path = %index_path.display(), "updated line index");

    let ids = track_ids(&index);
    info!(tracks = ids.len(), "fetching line timetables");

    let mut files: Vec<PathBuf> = stream::iter(ids.iter().copied())
        .map(|id| async move {
            let track = client.fetch_track(id).await?;
            let path = data_dir.join(track_file_name(id));
            write_json(&path, &track).await?;
            info!(path = %path.display(), "updated line timetable");
            tokio::time::sleep(config.delay).await;
            Ok::<_, FetchError>(path)
        })
        .buffer_unordered(config.concurrency.max(1))
        .try_collect()
        .await?;
    files.sort();
    files.insert(0, index_path);

    Ok(RefreshSummary {
        tracks: ids.len(),
        files,
    })
}

/// Distinct line ids listed in the index, ascending.
pub fn track_ids(index: &TrackIndexFile) -> Vec<u32> {
    index
        .body
        .iter()
        .flat_map(|group| group.list.iter().map(|t| t.city_track_id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Write `value` as pretty-printed JSON.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), FetchError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| FetchError::Json {
        url: path.display().to_string(),
        source,
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::files::{TrackFile, TrackGroupDto, TrackInfoDto};
    use crate::timetable::track_from_file;

    fn info(id: u32) -> TrackInfoDto {
        TrackInfoDto {
            city_track_id: id,
            track_name: format!("L{id}"),
            start_station_name: "竹料".to_string(),
            end_station_name: "科韵路".to_string(),
        }
    }

    #[test]
    fn ids_are_distinct_and_sorted() {
        let index = TrackIndexFile {
            body: vec![
                TrackGroupDto {
                    track_name: "东环".to_string(),
                    list: vec![info(241), info(240)],
                },
                TrackGroupDto {
                    track_name: "北环".to_string(),
                    list: vec![info(240), info(7)],
                },
            ],
        };
        assert_eq!(track_ids(&index), vec![7, 240, 241]);
    }

    #[tokio::test]
    async fn written_files_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let raw = r#"{"msg": "ok", "body": {
            "stationList": [
                {"stationId": 1, "stationName": "竹料", "stationPosition": 1, "creator": "x"},
                {"stationId": 2, "stationName": "科韵路", "stationPosition": 2}
            ],
            "trainTimeList": [{
                "trainNumber": {"trainNumberId": 7, "name": "S4731", "status": 1},
                "stationArriveTimeList": [
                    {"id": 1, "stationId": 1, "trainNumberId": 7, "arriveTime": "07:29", "isStartStation": 1},
                    {"id": 2, "stationId": 2, "trainNumberId": 7, "arriveTime": "08:02"}
                ]
            }]
        }}"#;
        let file: TrackFile = parse_body("u", raw).unwrap();

        let path = dir.path().join(track_file_name(240));
        write_json(&path, &file).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("creator"));
        assert!(!written.contains("isStartStation"));

        let reread: TrackFile = serde_json::from_str(&written).unwrap();
        let track = track_from_file(&info(240), reread);
        assert_eq!(track.stations().len(), 2);
        assert_eq!(track.runs()[0].name, "S4731");
    }

    #[tokio::test]
    async fn write_into_missing_dir_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("1.json");
        let err = write_json(&path, &serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
        assert!(err.to_string().contains("1.json"));
    }
}
