#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("end date cannot be before start date")]
    InvalidRange,
    #[error("price cannot be negative")]
    InvalidPrice,
    #[error("service name cannot be empty")]
    EmptyServiceName,
}
