/*
    Actuator Resources
*/

/* --------------------------- Steering -------------------------- */
pub trait SteeringCommand {
    /// Steering angle in degree, positive is right.
    fn set_angle(&mut self, angle: f32);
    fn in_range(&self, angle: f32) -> bool;
}

/* --------------------------- Propulsion -------------------------- */
pub trait DriveCommand {
    /// Signed duty cycle in percent.
    fn set_reference(&mut self, duty: f32);
    fn brake(&mut self);
    /// Drives against the current direction with `duty`, used for a hard brake pulse.
    fn inverse_direction(&mut self, duty: f32);
    fn in_range(&self, duty: f32) -> bool;
}
