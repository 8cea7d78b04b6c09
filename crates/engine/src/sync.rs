//! Observable initialization progress.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStepId {
    Database,
    Products,
    Users,
    Cart,
    Orders,
    Cache,
}

impl SyncStepId {
    pub const ALL: [SyncStepId; 6] = [
        Self::Database,
        Self::Products,
        Self::Users,
        Self::Cart,
        Self::Orders,
        Self::Cache,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "db",
            Self::Products => "products",
            Self::Users => "users",
            Self::Cart => "cart",
            Self::Orders => "orders",
            Self::Cache => "cache",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Database => "Initialize database",
            Self::Products => "Load product list",
            Self::Users => "Load account",
            Self::Cart => "Sync cart",
            Self::Orders => "Load order history",
            Self::Cache => "Cache for offline use",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Pending,
    Loading,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStep {
    pub id: SyncStepId,
    pub status: SyncStatus,
}

impl SyncStep {
    pub fn label(&self) -> &'static str {
        self.id.label()
    }
}

pub fn initial_steps() -> Vec<SyncStep> {
    SyncStepId::ALL
        .into_iter()
        .map(|id| SyncStep {
            id,
            status: SyncStatus::Pending,
        })
        .collect()
}

pub fn set_status(steps: &mut [SyncStep], id: SyncStepId, status: SyncStatus) {
    if let Some(step) = steps.iter_mut().find(|s| s.id == id) {
        step.status = status;
    }
}

pub fn all_done(steps: &[SyncStep]) -> bool {
    steps.iter().all(|s| s.status == SyncStatus::Done)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_start_pending_in_order() {
        let steps = initial_steps();
        let ids: Vec<_> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["db", "products", "users", "cart", "orders", "cache"]);
        assert!(steps.iter().all(|s| s.status == SyncStatus::Pending));
        assert!(!all_done(&steps));
    }

    #[test]
    fn set_status_targets_one_step() {
        let mut steps = initial_steps();
        set_status(&mut steps, SyncStepId::Cart, SyncStatus::Loading);
        assert_eq!(steps[3].status, SyncStatus::Loading);
        assert_eq!(steps[2].status, SyncStatus::Pending);
        for id in SyncStepId::ALL {
            set_status(&mut steps, id, SyncStatus::Done);
        }
        assert!(all_done(&steps));
    }
}
