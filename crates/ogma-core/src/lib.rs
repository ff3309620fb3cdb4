//! Hierarchical area statistics and compliance reporting for old-growth
//! management area (OGMA) analysis: classified land records aggregate into
//! per-landscape-unit trees, which summarize against regulatory retention
//! targets.

pub mod age;
pub mod breakdown;
pub mod error;
pub mod overrides;
pub mod record;
pub mod stats;
pub mod summary;
pub mod targets;

pub use breakdown::{age_class_breakdown, AgeClassRow};
pub use error::{Error, Result};
pub use overrides::PolicyOverrides;
pub use record::ClassifiedRecord;
pub use stats::{LandscapeInventory, UnitStatistics};
pub use summary::{summarize_unit, SummaryContext, UnitSummary};
pub use targets::{ResourcePlans, TargetTable};
