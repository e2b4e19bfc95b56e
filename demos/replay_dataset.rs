extern crate rgbd_input;

use std::path::Path;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use rgbd_input::config::Config;
use rgbd_input::session::Session;
use rgbd_input::gpu::{HostBackend,RGBDAdapter};
use rgbd_input::io::local_data_reader::LocalDataReader;
use rgbd_input::replay;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| String::from("config/tum_fr1_desk.yaml"));
    let config = Config::load(Path::new(&config_path))?;
    let mut session = Session::new(config);

    let mut reader = LocalDataReader::new(&session.config);
    reader.connect(&mut session);
    println!("{} frames, {} ground truth poses", reader.frame_count(), reader.trajectory().len());

    let (width, height) = (session.config.adapter.width, session.config.adapter.height);
    let mut adapter = RGBDAdapter::initialize(HostBackend::new(), reader, width, height)?;
    println!("depth intrinsics at {}x{}:{}", width, height, adapter.get_depth_intrinsics());

    while let Some(frame) = replay::next_frame(&mut adapter, &mut session)? {
        let depth = adapter.download_depth_map()?;
        let valid = depth.iter().filter(|d| d.is_finite() && **d > 0.0).count();
        match frame.ground_truth {
            Some(pose) => println!("frame {}: {} valid depth pixels, t = [{:.3}, {:.3}, {:.3}]", frame.frame_index, valid, pose[(0,3)], pose[(1,3)], pose[(2,3)]),
            None => println!("frame {}: {} valid depth pixels", frame.frame_index, valid)
        }
    }

    if let Some(average) = session.timing.average_rgbd_adapter_ms() {
        println!("adapter: {:.3} ms per frame over {} frames", average, session.timing.count_time_rgbd_adapter);
    }

    adapter.teardown()?;
    Ok(())
}
