use crate::math::{Rotator, map_range_clamped};
use bevy::math::{Vec2, Vec3};
use bevy::reflect::Reflect;

/// Operator input for one frame.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlInput {
    /// Camera / control rotation
    pub control_rotation: Rotator,
    /// Raw forward/backward axis in `[-1, 1]`
    pub move_forward: f32,
    /// Raw right/left axis in `[-1, 1]`
    pub move_right: f32,
}

impl ControlInput {
    pub fn new(control_rotation: Rotator, move_forward: f32, move_right: f32) -> Self {
        Self {
            control_rotation,
            move_forward,
            move_right,
        }
    }

    /// Normalized world direction of the raw axes, zero without input.
    pub fn movement_direction(&self) -> Vec3 {
        movement_input_direction(self.control_rotation, self.move_forward, self.move_right)
    }
}

/// Corrects gamepad diagonals: each axis is scaled up by how far the other axis is pushed
/// (`|other|` mapped from `[0, 0.6]` to `[1, 1.2]`), then clamped back to `[-1, 1]`.
///
/// Returns `(forward, right)`.
pub fn shape_axes(forward: f32, right: f32) -> Vec2 {
    let right_range = map_range_clamped(right.abs(), 0., 0.6, 1., 1.2);
    let forward_range = map_range_clamped(forward.abs(), 0., 0.6, 1., 1.2);
    Vec2::new(
        (forward * right_range).clamp(-1., 1.),
        (right * forward_range).clamp(-1., 1.),
    )
}

/// Unshaped, normalized input direction relative to the control heading. Control pitch is
/// ignored so looking up or down does not shorten the input.
pub fn movement_input_direction(control_rotation: Rotator, forward: f32, right: f32) -> Vec3 {
    let heading = Rotator::from_yaw(control_rotation.yaw);
    (heading.forward() * forward + heading.right() * right).normalize_or_zero()
}

/// Shaped input scaled onto the control heading's axes, as handed to the movement
/// integrator.
pub fn movement_input_request(control_rotation: Rotator, forward: f32, right: f32) -> Vec3 {
    let heading = Rotator::from_yaw(control_rotation.yaw);
    let shaped = shape_axes(forward, right);
    heading.forward() * shaped.x + heading.right() * shaped.y
}
