extern crate image as image_rs;
extern crate nalgebra as na;

mod common;

use std::fs;
use std::path::PathBuf;
use image_rs::{ImageBuffer,Luma};
use na::{Matrix4,Vector3,UnitQuaternion};

use rgbd_input::Float;
use rgbd_input::config::RGBDataType;
use rgbd_input::session::Session;
use rgbd_input::sensors::RGBDSensor;
use rgbd_input::gpu::{HostBackend,RGBDAdapter};
use rgbd_input::io::local_data_reader::{LocalDataReader,ReaderState};
use rgbd_input::io::trajectory::{PoseFormat,Identity,NegatedFocalY,parse_trajectory_line};
use rgbd_input::replay;

const TRAJECTORY: &str = "# timestamp tx ty tz qx qy qz qw\nc 1 2 3 0 0 0 1\na 4 5 6 0 0 0 1\nzz 0 0 0 0 0 0 1\n";

fn open_dataset(name: &str, ids: &[&str]) -> (LocalDataReader, Session, PathBuf) {
    let dir = common::scratch_dir(name);
    common::write_dataset(&dir, ids);
    let config = common::config(&dir, common::WIDTH, common::HEIGHT);
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);
    (reader, session, dir)
}

#[test]
fn open_lists_every_association_and_resets_cursor() {
    let dir = common::scratch_dir("open");
    common::write_dataset(&dir, &["a","b","c"]);
    let mut config = common::config(&dir, common::WIDTH, common::HEIGHT);
    config.dataset.min_frame_index = 1;
    let mut session = Session::new(config);
    session.current_frame_index = 5;

    let mut reader = LocalDataReader::new(&session.config);
    assert_eq!(reader.state(), ReaderState::Unopened);
    reader.connect(&mut session);

    assert_eq!(reader.frame_count(), 3);
    assert_eq!(session.current_frame_index, 1);
    assert_eq!(reader.state(), ReaderState::Opened);
    assert!(reader.trajectory().is_empty());
    assert_eq!(reader.associations()[2].color_file, "rgb/c.png");
}

#[test]
fn trajectory_restricts_and_orders_frames() {
    let (mut reader, _session, dir) = open_dataset("trajectory", &["a","b","c"]);
    fs::write(dir.join("groundtruth.txt"), TRAJECTORY).unwrap();
    reader.load_trajectory("groundtruth.txt");

    let ids = reader.associations().iter().map(|a| a.depth_id.as_str()).collect::<Vec<&str>>();
    assert_eq!(ids, vec!["c","a"]);
    assert_eq!(reader.trajectory().len(), 2);
    assert_eq!(reader.recorded_pose(0).unwrap()[(0,3)], 1.0);
    assert_eq!(reader.recorded_pose(1).unwrap()[(2,3)], 6.0);
    assert_eq!(reader.recorded_pose(2), None);
}

#[test]
fn unreadable_trajectory_keeps_associations() {
    let (mut reader, _session, _dir) = open_dataset("missing_trajectory", &["a","b","c"]);
    reader.load_trajectory("missing.txt");
    assert_eq!(reader.frame_count(), 3);
    assert!(reader.trajectory().is_empty());
}

#[test]
fn connect_without_trajectory_file_plays_every_frame() {
    let dir = common::scratch_dir("no_trajectory_file");
    common::write_dataset(&dir, &["a","b"]);
    let mut config = common::config(&dir, common::WIDTH, common::HEIGHT);
    config.dataset.read_camera_pose_from_file = true;
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);
    assert_eq!(reader.frame_count(), 2);
    assert!(reader.trajectory().is_empty());
}

#[test]
fn connect_loads_configured_trajectory() {
    let dir = common::scratch_dir("connect_trajectory");
    common::write_dataset(&dir, &["a","b","c"]);
    fs::write(dir.join("groundtruth.txt"), TRAJECTORY).unwrap();
    let mut config = common::config(&dir, common::WIDTH, common::HEIGHT);
    config.dataset.read_camera_pose_from_file = true;
    config.dataset.trajectory_file = Some(String::from("groundtruth.txt"));
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);
    assert_eq!(reader.frame_count(), 2);
    assert_eq!(reader.trajectory().len(), 2);
}

#[test]
fn depth_is_divided_by_scale_factor() {
    let dir = common::scratch_dir("depth_scale");
    common::write_dataset(&dir, &["a"]);
    common::write_depth_png(&dir.join("depth/a.png"), common::WIDTH, common::HEIGHT, 2500);
    let config = common::config(&dir, common::WIDTH, common::HEIGHT);
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);

    assert!(reader.process_depth(&session));
    assert!(reader.get_depth_float().iter().all(|&d| d == 0.5));
    assert_eq!(reader.state(), ReaderState::Playing);
}

#[test]
fn color_keeps_channel_order_with_opaque_alpha() {
    let dir = common::scratch_dir("color_order");
    common::write_dataset(&dir, &["a","b"]);
    common::write_color_png(&dir.join("rgb/a.png"), common::WIDTH, common::HEIGHT, [1,2,3]);
    let gray = ImageBuffer::<Luma<u8>,Vec<u8>>::from_raw(common::WIDTH as u32, common::HEIGHT as u32, vec![7; common::WIDTH*common::HEIGHT]).unwrap();
    gray.save(dir.join("rgb/b.png")).unwrap();

    let config = common::config(&dir, common::WIDTH, common::HEIGHT);
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);

    assert!(reader.process_color(&session));
    assert!(reader.get_color_rgbx().iter().all(|&c| c == [1,2,3,255]));
    session.advance_frame();
    assert!(reader.process_color(&session));
    assert!(reader.get_color_rgbx().iter().all(|&c| c == [7,7,7,255]));
}

#[test]
fn eight_bit_depth_is_rejected() {
    let dir = common::scratch_dir("depth_8bit");
    common::write_dataset(&dir, &["a"]);
    let depth = ImageBuffer::<Luma<u8>,Vec<u8>>::from_raw(common::WIDTH as u32, common::HEIGHT as u32, vec![9; common::WIDTH*common::HEIGHT]).unwrap();
    depth.save(dir.join("depth/a.png")).unwrap();

    let config = common::config(&dir, common::WIDTH, common::HEIGHT);
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);
    assert!(!reader.process_depth(&session));
    assert!(reader.get_depth_float().iter().all(|&d| d == 0.0));
}

#[test]
fn wrong_resolution_is_rejected() {
    let dir = common::scratch_dir("depth_size");
    common::write_dataset(&dir, &["a"]);
    common::write_depth_png(&dir.join("depth/a.png"), 2, 2, 1000);

    let config = common::config(&dir, common::WIDTH, common::HEIGHT);
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);
    assert!(!reader.process_depth(&session));
}

#[test]
fn exhausted_reader_leaves_adapter_untouched() {
    let (reader, mut session, _dir) = open_dataset("exhausted", &["a","b"]);
    session.current_frame_index = reader.frame_count();
    let mut adapter = RGBDAdapter::initialize(HostBackend::new(), reader, common::WIDTH, common::HEIGHT).unwrap();

    assert_eq!(adapter.process(&mut session), Ok(false));
    assert_eq!(adapter.sensor().state(), ReaderState::Exhausted);
    assert!(!adapter.sensor_mut().process_color(&session));
    assert_eq!(adapter.frame_number(), 0);
    assert_eq!(adapter.download_depth_map().unwrap(), vec![0.0; common::WIDTH*common::HEIGHT]);
}

#[test]
fn max_frame_index_bounds_playback() {
    let dir = common::scratch_dir("max_frame");
    common::write_dataset(&dir, &["a","b","c"]);
    let mut config = common::config(&dir, common::WIDTH, common::HEIGHT);
    config.dataset.max_frame_index = Some(1);
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);

    assert!(reader.is_frame_index_in_range(0, &session));
    assert!(reader.is_frame_index_in_range(1, &session));
    assert!(!reader.is_frame_index_in_range(2, &session));
    assert!(!reader.is_frame_index_in_range(3, &session));
}

#[test]
fn icl_nuim_negates_five_entries() {
    let rotation = UnitQuaternion::<Float>::from_euler_angles(0.3, -0.2, 0.7);
    let q = rotation.quaternion();
    let line = format!("0 0.5 -1.25 2 {} {} {} {}", q.i, q.j, q.k, q.w);

    let reference = parse_trajectory_line(&line, PoseFormat::Quaternion, &Identity).unwrap().pose;
    let corrected = parse_trajectory_line(&line, PoseFormat::Quaternion, &NegatedFocalY).unwrap().pose;
    let negated = [(0,1),(1,0),(1,2),(2,1),(1,3)];

    for r in 0..4 {
        for c in 0..4 {
            match negated.contains(&(r,c)) {
                true => assert_eq!(corrected[(r,c)], -reference[(r,c)]),
                false => assert_eq!(corrected[(r,c)], reference[(r,c)])
            }
        }
    }
}

#[test]
fn icl_nuim_reader_corrects_ground_truth() {
    let dir = common::scratch_dir("icl_nuim");
    common::write_dataset(&dir, &["a"]);
    fs::write(dir.join("groundtruth.txt"), "a 1 2 3 0 0 0 1\n").unwrap();
    let mut config = common::config(&dir, common::WIDTH, common::HEIGHT);
    config.dataset.data_type = RGBDataType::IclNuim;
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);
    reader.load_trajectory("groundtruth.txt");

    let pose = reader.recorded_pose(0).unwrap();
    assert_eq!(pose.fixed_view::<3,1>(0,3).into_owned(), Vector3::<Float>::new(1.0,-2.0,3.0));
}

#[test]
fn replay_yields_every_frame_with_ground_truth() {
    let dir = common::scratch_dir("replay");
    common::write_dataset(&dir, &["a","b","c"]);
    fs::write(dir.join("groundtruth.txt"), "a 1 0 0 0 0 0 1\nb 2 0 0 0 0 0 1\nc 3 0 0 0 0 0 1\n").unwrap();
    let mut config = common::config(&dir, common::WIDTH, common::HEIGHT);
    config.dataset.read_camera_pose_from_file = true;
    config.dataset.trajectory_file = Some(String::from("groundtruth.txt"));
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);

    let mut adapter = RGBDAdapter::initialize(HostBackend::new(), reader, common::WIDTH, common::HEIGHT).unwrap();
    let mut frames = Vec::new();
    while let Some(frame) = replay::next_frame(&mut adapter, &mut session).unwrap() {
        frames.push(frame);
    }

    assert_eq!(frames.len(), 3);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.frame_index, i);
        let mut expected = Matrix4::<Float>::identity();
        expected[(0,3)] = (i + 1) as Float;
        assert_eq!(frame.ground_truth, Some(expected));
    }
    assert_eq!(session.current_frame_index, 3);
    assert_eq!(adapter.frame_number(), 3);
    assert!(adapter.download_depth_map().unwrap().iter().all(|&d| (d - 0.6).abs() < 1e-6));
    assert_eq!(adapter.download_color_map().unwrap()[0], [20.0/255.0, 40.0/255.0, 60.0/255.0, 1.0]);
}

#[test]
fn replay_resamples_to_adapter_resolution() {
    let dir = common::scratch_dir("replay_resampled");
    common::write_dataset(&dir, &["a"]);
    let config = common::config(&dir, 2, 2);
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);

    let mut adapter = RGBDAdapter::initialize(HostBackend::new(), reader, 2, 2).unwrap();
    let frame = replay::next_frame(&mut adapter, &mut session).unwrap().unwrap();
    assert_eq!(frame.ground_truth, None);
    assert!(adapter.download_depth_map().unwrap().iter().all(|&d| (d - 0.2).abs() < 1e-6));
    assert!((adapter.get_depth_intrinsics()[(0,0)] - 2.5).abs() < 1e-6);
    assert!((adapter.get_depth_intrinsics()[(1,1)] - 2.0*2.0/3.0).abs() < 1e-5);
    assert_eq!(replay::next_frame(&mut adapter, &mut session).unwrap(), None);
}

#[test]
fn replay_skips_unreadable_frames() {
    let dir = common::scratch_dir("replay_skip");
    common::write_dataset(&dir, &["a","b","c"]);
    let depth = ImageBuffer::<Luma<u8>,Vec<u8>>::from_raw(common::WIDTH as u32, common::HEIGHT as u32, vec![9; common::WIDTH*common::HEIGHT]).unwrap();
    depth.save(dir.join("depth/b.png")).unwrap();

    let config = common::config(&dir, common::WIDTH, common::HEIGHT);
    let mut session = Session::new(config);
    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);

    let mut adapter = RGBDAdapter::initialize(HostBackend::new(), reader, common::WIDTH, common::HEIGHT).unwrap();
    let mut played = Vec::new();
    while let Some(frame) = replay::next_frame(&mut adapter, &mut session).unwrap() {
        played.push(frame.frame_index);
    }

    assert_eq!(played, vec![0,2]);
    assert_eq!(session.current_frame_index, 3);
    assert_eq!(adapter.sensor().state(), ReaderState::Exhausted);
    assert_eq!(adapter.frame_number(), 2);
    assert!(adapter.download_depth_map().unwrap().iter().all(|&d| (d - 0.6).abs() < 1e-6));
    assert_eq!(replay::next_frame(&mut adapter, &mut session).unwrap(), None);
    assert_eq!(session.current_frame_index, 3);
}
