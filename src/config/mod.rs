extern crate serde_yaml;

use std::fs;
use std::path::{Path, PathBuf};
use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::Float;

/// Convention of the recorded dataset. Selects how ground-truth poses are corrected on load.
#[derive(Debug,Copy,Clone,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RGBDataType {
    Tum,
    /// Trajectories generated with a negative vertical focal length.
    IclNuim
}

impl Default for RGBDataType {
    fn default() -> Self {
        RGBDataType::Tum
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct DatasetConfig {
    pub data_path: PathBuf,
    pub association_file: String,
    #[serde(default)]
    pub trajectory_file: Option<String>,
    #[serde(default)]
    pub read_camera_pose_from_file: bool,
    #[serde(default = "default_true")]
    pub camera_pose_quaternion: bool,
    #[serde(default)]
    pub data_type: RGBDataType,
    #[serde(default = "default_depth_scale_factor")]
    pub depth_scale_factor: u32,
    #[serde(default)]
    pub min_frame_index: usize,
    #[serde(default)]
    pub max_frame_index: Option<usize>
}

/// Native resolutions and calibration of the frame source.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SensorConfig {
    pub depth_width: usize,
    pub depth_height: usize,
    pub color_width: usize,
    pub color_height: usize,
    pub fx: Float,
    pub fy: Float,
    pub cx: Float,
    pub cy: Float
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct AdapterConfig {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub timings_detailed: bool
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub sensor: SensorConfig,
    pub adapter: AdapterConfig
}

impl Config {

    pub fn load(file_path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(file_path).wrap_err_with(|| format!("failed to read config {}", file_path.display()))?;
        Config::from_yaml_str(&contents).wrap_err_with(|| format!("failed to parse config {}", file_path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

fn default_depth_scale_factor() -> u32 {
    5000
}
