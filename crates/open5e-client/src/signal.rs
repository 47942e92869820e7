use crate::error::ClientError;

/// Application-level error signal, raised for domain "not found" failures
/// before the error is returned to the caller.
pub trait ErrorSignal: Send + Sync {
    fn raise(&self, error: &ClientError);
}

/// Default signal: logs the failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSignal;

impl ErrorSignal for TracingSignal {
    fn raise(&self, error: &ClientError) {
        tracing::error!(error = %error, not_found = error.is_not_found(), "lookup failed");
    }
}
