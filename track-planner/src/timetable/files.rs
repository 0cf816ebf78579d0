//! On-disk timetable file formats.
//!
//! These mirror the cleaned JSON the refresh tool writes into the data
//! directory: one `SingleCityTrack.json` listing the lines, and one
//! `{cityTrackId}.json` per line with its stations and runs.

use serde::{Deserialize, Serialize};

/// File name of the line index inside the data directory.
pub const TRACK_INDEX_FILE: &str = "SingleCityTrack.json";

/// File name of one line's timetable inside the data directory.
pub fn track_file_name(city_track_id: u32) -> String {
    format!("{city_track_id}.json")
}

/// `SingleCityTrack.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackIndexFile {
    pub body: Vec<TrackGroupDto>,
}

/// A group of lines sharing a public name (usually both directions of one
/// route).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackGroupDto {
    pub track_name: String,
    pub list: Vec<TrackInfoDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfoDto {
    pub city_track_id: u32,
    pub track_name: String,
    pub start_station_name: String,
    pub end_station_name: String,
}

/// `{cityTrackId}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackFile {
    pub body: TrackBodyDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBodyDto {
    pub station_list: Vec<StationDto>,
    #[serde(default)]
    pub train_time_list: Vec<TrainTimeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub station_id: u32,
    pub station_name: String,
    pub station_position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainTimeDto {
    pub train_number: TrainNumberDto,
    #[serde(default)]
    pub station_arrive_time_list: Vec<StationArriveTimeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainNumberDto {
    pub train_number_id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationArriveTimeDto {
    pub id: u64,
    pub station_id: u32,
    pub train_number_id: u32,
    #[serde(default)]
    pub arrive_time: Option<String>,
}
