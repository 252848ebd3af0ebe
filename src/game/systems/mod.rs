pub mod kinematics;
pub mod possession;
pub mod wander;
