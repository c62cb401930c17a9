//! Concrete model definitions.

pub mod bouncing_ball;
pub mod dummy;

pub use bouncing_ball::BouncingBall;
pub use dummy::Dummy;
