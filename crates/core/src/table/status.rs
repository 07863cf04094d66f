use std::fmt;

/// Table status as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Creating,
    Active,
    Updating,
    Deleting,
    /// Any status this crate does not act on (archival, lost KMS access, ...).
    Other(String),
}

impl TableStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, TableStatus::Active)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStatus::Creating => f.write_str("CREATING"),
            TableStatus::Active => f.write_str("ACTIVE"),
            TableStatus::Updating => f.write_str("UPDATING"),
            TableStatus::Deleting => f.write_str("DELETING"),
            TableStatus::Other(status) => f.write_str(status),
        }
    }
}

/// Where a harness-owned table is in its lifecycle.
///
/// `Absent -> Provisioning -> Active -> Deleting -> Gone`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Absent,
    Provisioning,
    Active,
    Deleting,
    Gone,
}

impl LifecycleState {
    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Absent, Provisioning) | (Provisioning, Active) | (Active, Deleting) | (Deleting, Gone)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        assert!(TableStatus::Active.is_active());
        assert!(!TableStatus::Creating.is_active());
        assert!(!TableStatus::Other("ARCHIVED".to_string()).is_active());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TableStatus::Creating.to_string(), "CREATING");
        assert_eq!(TableStatus::Other("ARCHIVING".to_string()).to_string(), "ARCHIVING");
    }

    #[test]
    fn test_lifecycle_transitions() {
        use LifecycleState::*;

        assert!(Absent.can_transition_to(Provisioning));
        assert!(Provisioning.can_transition_to(Active));
        assert!(Active.can_transition_to(Deleting));
        assert!(Deleting.can_transition_to(Gone));

        assert!(!Absent.can_transition_to(Active));
        assert!(!Provisioning.can_transition_to(Deleting));
        assert!(!Gone.can_transition_to(Absent));
    }
}
