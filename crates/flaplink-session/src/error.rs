/// Errors that can occur in the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An outbound action was requested before the authority assigned
    /// this client an identity. The action must be suppressed rather
    /// than sent unattributed.
    #[error("no identity assigned yet — action cannot be attributed")]
    IdentityUnassigned,
}
