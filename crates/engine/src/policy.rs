/// Engine-level behavior toggles, plumbed explicitly (never read from
/// globals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnginePolicy {
    /// Whether payments may still be recorded against a voided order.
    ///
    /// The historical behavior is to accept them, so that is the default;
    /// stricter deployments can turn it off and such payments fail as
    /// invalid transitions.
    pub allow_payments_on_voided: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            allow_payments_on_voided: true,
        }
    }
}
