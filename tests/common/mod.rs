#![allow(dead_code)]

extern crate image as image_rs;

use std::fs;
use std::path::{Path,PathBuf};
use image_rs::{ImageBuffer,Luma,Rgb};

use rgbd_input::Float;
use rgbd_input::config::{Config,DatasetConfig,SensorConfig,AdapterConfig,RGBDataType};
use rgbd_input::session::Session;
use rgbd_input::sensors::{RGBDSensor,SensorFrame};

pub const WIDTH: usize = 4;
pub const HEIGHT: usize = 3;

/// Fresh directory under the system temp dir, unique per test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rgbd_input_{}_{}", name, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(dir.join("depth")).unwrap();
    fs::create_dir_all(dir.join("rgb")).unwrap();
    dir
}

pub fn write_depth_png(path: &Path, width: usize, height: usize, value: u16) {
    let buffer = ImageBuffer::<Luma<u16>,Vec<u16>>::from_raw(width as u32, height as u32, vec![value; width*height]).unwrap();
    buffer.save(path).unwrap();
}

pub fn write_color_png(path: &Path, width: usize, height: usize, rgb: [u8;3]) {
    let data = (0..width*height).flat_map(|_| rgb.iter().copied()).collect::<Vec<u8>>();
    let buffer = ImageBuffer::<Rgb<u8>,Vec<u8>>::from_raw(width as u32, height as u32, data).unwrap();
    buffer.save(path).unwrap();
}

/**
 * Dataset with one frame per id. Frame i has depth 1000*(i+1) and color (10*i, 20*i, 30*i).
 */
pub fn write_dataset(dir: &Path, ids: &[&str]) {
    let mut associations = String::new();
    for (i, id) in ids.iter().enumerate() {
        let depth_file = format!("depth/{}.png", id);
        let color_file = format!("rgb/{}.png", id);
        write_depth_png(&dir.join(&depth_file), WIDTH, HEIGHT, 1000*(i as u16 + 1));
        write_color_png(&dir.join(&color_file), WIDTH, HEIGHT, [10*i as u8, 20*i as u8, 30*i as u8]);
        associations.push_str(&format!("{} {} {} {}\n", id, depth_file, id, color_file));
    }
    fs::write(dir.join("associations.txt"), associations).unwrap();
}

pub fn config(data_path: &Path, adapter_width: usize, adapter_height: usize) -> Config {
    Config {
        dataset: DatasetConfig {
            data_path: data_path.to_path_buf(),
            association_file: String::from("associations.txt"),
            trajectory_file: None,
            read_camera_pose_from_file: false,
            camera_pose_quaternion: true,
            data_type: RGBDataType::Tum,
            depth_scale_factor: 5000,
            min_frame_index: 0,
            max_frame_index: None
        },
        sensor: SensorConfig {
            depth_width: WIDTH,
            depth_height: HEIGHT,
            color_width: WIDTH,
            color_height: HEIGHT,
            fx: 5.0,
            fy: 4.0,
            cx: 1.5,
            cy: 1.0
        },
        adapter: AdapterConfig {
            width: adapter_width,
            height: adapter_height,
            timings_detailed: false
        }
    }
}

/// In-memory sensor serving a fixed number of frames and recording the call order.
pub struct ScriptedSensor {
    pub frame: SensorFrame,
    pub frames_available: usize,
    pub fail_color: bool,
    pub calls: Vec<&'static str>
}

impl ScriptedSensor {
    pub fn new(depth: (usize,usize), color: (usize,usize), frames_available: usize) -> ScriptedSensor {
        let mut frame = SensorFrame::new(depth.0, depth.1, color.0, color.1);
        frame.initialize_depth_intrinsics(525.0, 520.0, 319.5, 239.5);
        frame.initialize_color_intrinsics(530.0, 515.0, 320.5, 240.5);
        ScriptedSensor{frame, frames_available, fail_color: false, calls: Vec::new()}
    }

    pub fn fill(&mut self, depth: &[Float], color: &[[u8;4]]) {
        self.frame.depth_float.copy_from_slice(depth);
        self.frame.color_rgbx.copy_from_slice(color);
    }
}

impl RGBDSensor for ScriptedSensor {
    fn process_depth(&mut self, session: &Session) -> bool {
        self.calls.push("depth");
        session.current_frame_index < self.frames_available
    }

    fn process_color(&mut self, session: &Session) -> bool {
        self.calls.push("color");
        !self.fail_color && session.current_frame_index < self.frames_available
    }

    fn frame(&self) -> &SensorFrame {
        &self.frame
    }
}
