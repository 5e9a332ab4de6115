use crate::{
    controller::LocomotionController,
    driver::{AnimationDriver, BlendOutputs, DriverInputs},
    facade::{AnimCurveSource, MovementFacade},
    input::ControlInput,
};

/// Runs one frame for a single character, in order: movement request, physics step, movement
/// mode change notification, controller tick and driver evaluation.
///
/// `curves` are the curve values published by the animation that played last frame.
pub fn step_frame<'a, M, C>(
    dt: f32,
    movement: &mut M,
    controller: &mut LocomotionController,
    driver: &'a mut AnimationDriver,
    control: &ControlInput,
    curves: &C,
    mesh_scale: f32,
) -> &'a BlendOutputs
where
    M: MovementFacade + ?Sized,
    C: AnimCurveSource + ?Sized,
{
    if let Some(request) = controller.movement_input_request(control) {
        movement.add_movement_input(request);
    }
    movement.step(dt);

    let mode = movement.movement_mode();
    if mode != controller.pawn_movement_mode() {
        controller.on_movement_mode_changed(mode);
    }

    controller.tick(dt, movement, control, curves);

    let inputs = DriverInputs::gather(controller, &*movement, curves, mesh_scale);
    driver.evaluate(dt, &inputs)
}
