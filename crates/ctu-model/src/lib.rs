//! Shared data model for the trial universe pipeline.
//!
//! Everything downstream of the registry download works over these types:
//! validated identifiers, criterion instance rows with dynamic field maps,
//! resource lookup tables with an explicit schema resolved at load time,
//! and per-trial selection rules.

pub mod direction;
pub mod error;
pub mod ids;
pub mod instance;
pub mod resource;
pub mod rule;
pub mod tags;
pub mod text;

pub use direction::Direction;
pub use error::{ModelError, Result};
pub use ids::{CriterionClass, TrialId};
pub use instance::{CurationColumn, InstanceRow};
pub use resource::{ResourceRow, ResourceSchema, ResourceTable};
pub use rule::SelectionRule;
pub use tags::TagSet;
pub use text::normalize_key;
