extern crate nalgebra as na;

use na::Matrix4;
use tracing::{info,warn};

use crate::Float;
use crate::session::Session;
use crate::gpu::{ComputeBackend,DeviceError,RGBDAdapter};
use crate::io::local_data_reader::{LocalDataReader,ReaderState};

/// A frame that has been written to the adapter buffers.
#[derive(Debug,Clone,PartialEq)]
pub struct ReplayFrame {
    pub frame_index: usize,
    pub ground_truth: Option<Matrix4<Float>>
}

/**
 * Processes the frame under the session cursor and moves the cursor on.
 * Frames that cannot be read are skipped with a warning. Returns `None` once the
 * dataset is exhausted.
 */
pub fn next_frame<B: ComputeBackend>(adapter: &mut RGBDAdapter<B,LocalDataReader>, session: &mut Session) -> Result<Option<ReplayFrame>, DeviceError> {
    loop {
        let frame_index = session.current_frame_index;
        if adapter.process(session)? {
            let ground_truth = adapter.sensor().recorded_pose(frame_index).copied();
            session.advance_frame();
            return Ok(Some(ReplayFrame{frame_index, ground_truth}));
        }

        match adapter.sensor().state() {
            ReaderState::Exhausted => {
                info!("playback stopped at frame {}", frame_index);
                return Ok(None);
            },
            _ => {
                warn!("skipping frame {}, it could not be read", frame_index);
                session.advance_frame();
            }
        }
    }
}
