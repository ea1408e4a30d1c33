pub mod autoscaling;
pub mod ssm;

pub use autoscaling::AutoScalingMembership;
pub use ssm::SsmCommandService;
