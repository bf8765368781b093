//! Per-entity filter definitions for the four list views.

pub mod assay;
pub mod program;
pub mod study;
pub mod user;

use super::{
    config::Endpoints,
    definition::{FilterDefinition, FilterOption},
    model::{AssayType, Program, Status},
    result::DefinitionResult,
};
use serde::de::DeserializeOwned;

/// Which reference collections a list view needs before its first filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceNeeds {
    pub programs: bool,
    pub assay_types: bool,
}

/// Auxiliary collections feeding dynamic filter options and extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub programs: Vec<Program>,
    pub assay_types: Vec<AssayType>,
    pub current_user: Option<i64>,
}

impl ReferenceData {
    pub fn program_options(&self) -> Vec<FilterOption> {
        self.programs.iter()
            .map(|p| FilterOption::new(p.id, p.name.clone()))
            .collect()
    }

    pub fn assay_type_options(&self) -> Vec<FilterOption> {
        self.assay_types.iter()
            .map(|t| FilterOption::new(t.id, t.name.clone()))
            .collect()
    }
}

pub fn status_options() -> Vec<FilterOption> {
    Status::ALL.iter()
        .map(|s| FilterOption::new(s.as_str(), s.label()))
        .collect()
}

/// An entity type that backs a filterable list view.
pub trait ListEntity: DeserializeOwned + Send + Sync + 'static {
    const NAME: &'static str;
    const NEEDS: ReferenceNeeds;

    fn endpoint(endpoints: &Endpoints) -> &str;

    fn definition(reference: &ReferenceData) -> DefinitionResult<FilterDefinition<Self>>;
}
