extern crate nalgebra as na;

use na::{Vector3,Matrix3,Matrix4,Quaternion,UnitQuaternion,Isometry,Translation3,Rotation3};
use crate::Float;

pub fn se3(t: &Vector3<Float>, rotation: &Matrix3<Float>) -> Matrix4<Float> {
    let mut pose = Matrix4::<Float>::identity();
    pose.fixed_view_mut::<3,3>(0,0).copy_from(rotation);
    pose.fixed_view_mut::<3,1>(0,3).copy_from(t);
    pose
}

/**
 * Homogeneous pose from a translation and a (w,x,y,z) quaternion.
 * The quaternion is normalized before it is turned into a rotation.
 */
pub fn from_translation_quaternion(t: &Vector3<Float>, qw: Float, qx: Float, qy: Float, qz: Float) -> Matrix4<Float> {
    let rotation = UnitQuaternion::<Float>::from_quaternion(Quaternion::<Float>::new(qw,qx,qy,qz)).to_rotation_matrix();
    Isometry::<Float, Rotation3<Float>,3>::from_parts(Translation3::from(*t), rotation).to_homogeneous()
}

pub fn quaternion_from_rotation(rotation: &Matrix3<Float>) -> UnitQuaternion<Float> {
    UnitQuaternion::<Float>::from_matrix(rotation)
}

pub fn decomp(pose: &Matrix4<Float>) -> (Vector3<Float>,Matrix3<Float>) {
    (pose.fixed_view::<3,1>(0,3).into_owned(),pose.fixed_view::<3,3>(0,0).into_owned())
}
