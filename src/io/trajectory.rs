extern crate nalgebra as na;

use std::fmt;
use std::fs;
use std::path::Path;
use na::{Matrix4,Vector3};
use tracing::warn;

use crate::Float;
use crate::config::RGBDataType;
use crate::io::association::AssociationRecord;
use crate::numerics::pose;

#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum PoseFormat {
    /// `<depth id> tx ty tz qx qy qz qw`
    Quaternion,
    /// `<depth id> m00 m01 ... m33`, row major
    Matrix
}

impl PoseFormat {
    pub fn from_flag(camera_pose_quaternion: bool) -> PoseFormat {
        match camera_pose_quaternion {
            true => PoseFormat::Quaternion,
            false => PoseFormat::Matrix
        }
    }
}

/// Correction bringing ground-truth poses of a dataset into the reader's convention.
pub trait PoseConvention: fmt::Debug + Send + Sync {
    fn correct(&self, pose: &mut Matrix4<Float>) -> ();
}

#[derive(Debug,Copy,Clone,Default)]
pub struct Identity;

impl PoseConvention for Identity {
    fn correct(&self, _pose: &mut Matrix4<Float>) -> () {}
}

/**
 * Trajectories rendered with a negative vertical focal length (ICL-NUIM).
 * Flips the y axis coupling of the rotation and the y translation.
 */
#[derive(Debug,Copy,Clone,Default)]
pub struct NegatedFocalY;

impl PoseConvention for NegatedFocalY {
    fn correct(&self, pose: &mut Matrix4<Float>) -> () {
        for &(r,c) in [(0,1),(1,0),(1,2),(2,1),(1,3)].iter() {
            pose[(r,c)] = -pose[(r,c)];
        }
    }
}

pub fn convention_for(data_type: RGBDataType) -> Box<dyn PoseConvention> {
    match data_type {
        RGBDataType::Tum => Box::new(Identity),
        RGBDataType::IclNuim => Box::new(NegatedFocalY)
    }
}

#[derive(Debug,Clone,PartialEq)]
pub struct TrajectoryRecord {
    pub depth_id: String,
    pub pose: Matrix4<Float>
}

/// The convention is only applied to quaternion poses. Matrix poses are taken verbatim.
pub fn parse_trajectory_line(line: &str, format: PoseFormat, convention: &dyn PoseConvention) -> Option<TrajectoryRecord> {
    let mut tokens = line.split_whitespace();
    let depth_id = tokens.next()?.to_string();
    let values = tokens.map(|t| t.parse::<Float>()).collect::<Result<Vec<Float>,_>>().ok()?;

    let pose = match format {
        PoseFormat::Quaternion => {
            if values.len() < 7 {
                return None;
            }
            let t = Vector3::<Float>::new(values[0],values[1],values[2]);
            let mut pose = pose::from_translation_quaternion(&t, values[6], values[3], values[4], values[5]);
            convention.correct(&mut pose);
            pose
        },
        PoseFormat::Matrix => {
            if values.len() < 16 {
                return None;
            }
            Matrix4::<Float>::from_row_slice(&values[..16])
        }
    };

    Some(TrajectoryRecord{depth_id, pose})
}

pub fn parse_trajectory(contents: &str, format: PoseFormat, convention: &dyn PoseConvention) -> Vec<TrajectoryRecord> {
    let mut records = Vec::<TrajectoryRecord>::new();
    for (line_number, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_trajectory_line(trimmed, format, convention) {
            Some(record) => records.push(record),
            None => warn!("trajectory line {} is malformed: {}", line_number + 1, trimmed)
        }
    }
    records
}

pub fn load_trajectory(file_path: &Path, format: PoseFormat, convention: &dyn PoseConvention) -> Option<Vec<TrajectoryRecord>> {
    match fs::read_to_string(file_path) {
        Ok(contents) => Some(parse_trajectory(&contents, format, convention)),
        Err(e) => {
            warn!("cannot read the trajectory file {}: {}", file_path.display(), e);
            None
        }
    }
}

/**
 * Keeps the poses whose depth id is in the association list, in trajectory order, and
 * rebuilds the association list to match. Both outputs are index aligned.
 */
pub fn match_trajectory(associations: &[AssociationRecord], trajectory: Vec<TrajectoryRecord>) -> (Vec<AssociationRecord>, Vec<Matrix4<Float>>) {
    let mut matched_associations = Vec::<AssociationRecord>::with_capacity(trajectory.len());
    let mut poses = Vec::<Matrix4<Float>>::with_capacity(trajectory.len());

    for record in trajectory {
        match associations.iter().find(|a| a.depth_id == record.depth_id) {
            Some(association) => {
                matched_associations.push(association.clone());
                poses.push(record.pose);
            },
            None => warn!("the association file does not contain the depth frame {}", record.depth_id)
        }
    }

    (matched_associations, poses)
}
