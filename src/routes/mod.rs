mod envelope;
pub mod health_check;
pub mod subscriptions;

pub use envelope::Envelope;
