/// What to do when a source redefines a type or directive that is already registered.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum ConflictPolicy {
    /// Keep the first registered definition. Object types still gain the fields
    /// they did not have yet.
    #[default]
    FirstWins,
    /// Fail the merge unless the redefinition is structurally identical. Object types
    /// may add fields, but fields present in both must have the same type.
    Reject,
}

/// The order in which [`compose`](crate::compose) folds its sources.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum MergeOrder {
    /// Sort by source name, so the result does not depend on how sources were
    /// enumerated.
    #[default]
    BySource,
    AsGiven,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct MergeOptions {
    pub conflicts: ConflictPolicy,
    pub order: MergeOrder,
}

impl MergeOptions {
    pub fn reject_conflicts() -> MergeOptions {
        MergeOptions {
            conflicts: ConflictPolicy::Reject,
            ..Default::default()
        }
    }
}
