extern crate nalgebra as na;

use std::path::{Path,PathBuf};
use na::Matrix4;
use tracing::{info,warn};

use crate::Float;
use crate::config::Config;
use crate::session::Session;
use crate::sensors::{RGBDSensor,SensorFrame};
use crate::io::{load_depth_image,load_color_image};
use crate::io::association::{AssociationRecord,load_associations};
use crate::io::trajectory::{PoseFormat,PoseConvention,convention_for,load_trajectory,match_trajectory};

#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum ReaderState {
    Unopened,
    Opened,
    Playing,
    Exhausted
}

/**
 * Replays a recorded RGB-D dataset as a sensor.
 *
 * Frames are listed in an association file and decoded lazily when the session cursor
 * reaches them. An optional trajectory file supplies one ground-truth pose per frame and
 * restricts playback to the frames it covers.
 */
#[derive(Debug)]
pub struct LocalDataReader {
    frame: SensorFrame,
    data_path: PathBuf,
    depth_scale_factor: u32,
    pose_format: PoseFormat,
    pose_convention: Box<dyn PoseConvention>,
    associations: Vec<AssociationRecord>,
    trajectory: Vec<Matrix4<Float>>,
    state: ReaderState
}

impl LocalDataReader {

    /// Depth and color share the configured pinhole.
    pub fn new(config: &Config) -> LocalDataReader {
        let sensor = &config.sensor;
        let mut frame = SensorFrame::new(sensor.depth_width, sensor.depth_height, sensor.color_width, sensor.color_height);
        frame.initialize_depth_intrinsics(sensor.fx, sensor.fy, sensor.cx, sensor.cy);
        frame.initialize_color_intrinsics(sensor.fx, sensor.fy, sensor.cx, sensor.cy);

        LocalDataReader {
            frame,
            data_path: config.dataset.data_path.clone(),
            depth_scale_factor: config.dataset.depth_scale_factor,
            pose_format: PoseFormat::from_flag(config.dataset.camera_pose_quaternion),
            pose_convention: convention_for(config.dataset.data_type),
            associations: Vec::new(),
            trajectory: Vec::new(),
            state: ReaderState::Unopened
        }
    }

    pub fn with_pose_convention(mut self, pose_convention: Box<dyn PoseConvention>) -> LocalDataReader {
        self.pose_convention = pose_convention;
        self
    }

    /// Opens the configured dataset and, if requested, its trajectory.
    pub fn connect(&mut self, session: &mut Session) -> () {
        let dataset = session.config.dataset.clone();
        self.open(&dataset.data_path, &dataset.association_file, session);
        info!("reading RGB-D data from {}", dataset.data_path.display());

        if dataset.read_camera_pose_from_file {
            match dataset.trajectory_file {
                Some(trajectory_file) => self.load_trajectory(&trajectory_file),
                None => warn!("camera poses requested but no trajectory file is configured")
            }
        }
    }

    /// An unreadable association file leaves the reader without frames.
    pub fn open(&mut self, data_path: &Path, association_file: &str, session: &mut Session) -> () {
        self.data_path = data_path.to_path_buf();
        self.associations = load_associations(&data_path.join(association_file)).unwrap_or_default();
        self.trajectory.clear();
        self.state = ReaderState::Opened;
        session.reset_cursor();
    }

    /// An unreadable trajectory file leaves the association list untouched.
    pub fn load_trajectory(&mut self, trajectory_file: &str) -> () {
        let file_path = self.data_path.join(trajectory_file);
        if let Some(records) = load_trajectory(&file_path, self.pose_format, self.pose_convention.as_ref()) {
            let (associations, trajectory) = match_trajectory(&self.associations, records);
            self.associations = associations;
            self.trajectory = trajectory;
        }
    }

    pub fn is_frame_index_in_range(&self, frame_index: usize, session: &Session) -> bool {
        let below_max = match session.config.dataset.max_frame_index {
            Some(max) => frame_index <= max,
            None => true
        };
        frame_index < self.associations.len() && below_max
    }

    pub fn frame_count(&self) -> usize {
        self.associations.len()
    }

    pub fn associations(&self) -> &[AssociationRecord] {
        &self.associations
    }

    pub fn trajectory(&self) -> &[Matrix4<Float>] {
        &self.trajectory
    }

    pub fn recorded_pose(&self, frame_index: usize) -> Option<&Matrix4<Float>> {
        self.trajectory.get(frame_index)
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    fn current_record(&mut self, session: &Session) -> Option<AssociationRecord> {
        let frame_index = session.current_frame_index;
        match self.is_frame_index_in_range(frame_index, session) {
            true => {
                self.state = ReaderState::Playing;
                Some(self.associations[frame_index].clone())
            },
            false => {
                if self.state != ReaderState::Exhausted {
                    info!("all RGB-D frames are read");
                }
                self.state = ReaderState::Exhausted;
                None
            }
        }
    }
}

impl RGBDSensor for LocalDataReader {

    fn process_depth(&mut self, session: &Session) -> bool {
        let record = match self.current_record(session) {
            Some(record) => record,
            None => return false
        };
        let (width, height) = (self.frame.depth_width, self.frame.depth_height);
        info!("reading depth frame {}, filename = {}", session.current_frame_index, record.depth_file);
        load_depth_image(&self.data_path.join(&record.depth_file), self.depth_scale_factor, width, height, &mut self.frame.depth_float)
    }

    fn process_color(&mut self, session: &Session) -> bool {
        let record = match self.current_record(session) {
            Some(record) => record,
            None => return false
        };
        let (width, height) = (self.frame.color_width, self.frame.color_height);
        info!("reading color frame {}, filename = {}", session.current_frame_index, record.color_file);
        load_color_image(&self.data_path.join(&record.color_file), width, height, &mut self.frame.color_rgbx)
    }

    fn frame(&self) -> &SensorFrame {
        &self.frame
    }
}
