extern crate nalgebra as na;

use na::Matrix4;
use crate::Float;

/// Pinhole intrinsics in homogeneous 4x4 form, kept together with the inverse.
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Pinhole {
    pub projection: Matrix4<Float>,
    pub inverse_projection: Matrix4<Float>
}

impl Pinhole {
    pub fn new(fx: Float, fy: Float, cx: Float, cy: Float) -> Pinhole {
       let projection = Matrix4::<Float>::new(
        fx, 0.0, cx, 0.0,
        0.0, fy, cy, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0);
       let inverse_projection = Matrix4::<Float>::new(
        1.0/fx, 0.0, -cx/fx, 0.0,
        0.0, 1.0/fy, -cy/fy, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0);

      Pinhole{projection,inverse_projection}
    }

    pub fn identity() -> Pinhole {
        Pinhole{projection: Matrix4::<Float>::identity(), inverse_projection: Matrix4::<Float>::identity()}
    }

    /**
     * Intrinsics of the same camera after its image is resized by (scale_x,scale_y).
     * The inverse principal terms -c/f are invariant under the scale, so only the
     * inverse focal terms change.
     */
    pub fn scale(&self, scale_x: Float, scale_y: Float) -> Pinhole {
        let mut projection = self.projection;
        projection[(0,0)] *= scale_x;
        projection[(0,2)] *= scale_x;
        projection[(1,1)] *= scale_y;
        projection[(1,2)] *= scale_y;

        let mut inverse_projection = self.inverse_projection;
        inverse_projection[(0,0)] /= scale_x;
        inverse_projection[(1,1)] /= scale_y;

        Pinhole{projection,inverse_projection}
    }
}
