//! Conversion between Bevy's world space (`Y` up, `-Z` forward, `X` right, meters) and the
//! locomotion frame (`X` forward, `Y` right, `Z` up, centimeters).

use bevy::math::{Quat, Vec3};
use bevy_locomotion_core::math::Rotator;

/// Locomotion distance units in one Bevy world unit.
pub const UNITS_PER_METER: f32 = 100.;

pub fn to_locomotion_space(vector: Vec3) -> Vec3 {
    Vec3::new(-vector.z, vector.x, vector.y)
}

pub fn to_bevy_space(vector: Vec3) -> Vec3 {
    Vec3::new(vector.y, vector.z, -vector.x)
}

pub fn velocity_to_locomotion(velocity: Vec3) -> Vec3 {
    to_locomotion_space(velocity) * UNITS_PER_METER
}

pub fn velocity_to_bevy(velocity: Vec3) -> Vec3 {
    to_bevy_space(velocity) / UNITS_PER_METER
}

/// Orientation whose forward axis matches the forward axis of a Bevy rotation. Useful for
/// camera rotations, which keep their pitch.
pub fn rotator_from_bevy(rotation: Quat) -> Rotator {
    Rotator::from_direction(to_locomotion_space(rotation * Vec3::NEG_Z))
}

/// Upright Bevy rotation facing along the rotator's yaw. Pitch and roll are dropped.
pub fn facing_to_bevy(rotator: Rotator) -> Quat {
    Quat::from_rotation_y(-rotator.yaw.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_map_between_spaces() {
        assert_eq!(to_locomotion_space(Vec3::NEG_Z), Vec3::X);
        assert_eq!(to_locomotion_space(Vec3::X), Vec3::Y);
        assert_eq!(to_locomotion_space(Vec3::Y), Vec3::Z);

        let v = Vec3::new(1., -2., 3.);
        assert_eq!(to_bevy_space(to_locomotion_space(v)), v);

        // One meter per second forward
        assert_eq!(velocity_to_locomotion(Vec3::NEG_Z), Vec3::new(100., 0., 0.));
        assert_eq!(velocity_to_bevy(Vec3::new(0., 0., 250.)), Vec3::new(0., 2.5, 0.));
    }

    #[test]
    fn facing_matches_rotator_forward() {
        for yaw in [0., 45., 90., -135., 180.] {
            let rotator = Rotator::from_yaw(yaw);
            let bevy_forward = facing_to_bevy(rotator) * Vec3::NEG_Z;
            assert!(
                to_locomotion_space(bevy_forward).abs_diff_eq(rotator.forward(), 1.0e-5),
                "yaw {yaw}"
            );

            let back = rotator_from_bevy(facing_to_bevy(rotator));
            assert!(
                Rotator::from_yaw(back.yaw).forward().abs_diff_eq(rotator.forward(), 1.0e-5),
                "yaw {yaw}"
            );
        }
    }

    #[test]
    fn camera_pitch_survives_conversion() {
        let looking_down = Quat::from_rotation_x(-30f32.to_radians());
        let rotator = rotator_from_bevy(looking_down);
        assert!((rotator.pitch + 30.).abs() < 1.0e-3);
        assert!(rotator.yaw.abs() < 1.0e-3);
    }
}
