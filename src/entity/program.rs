use super::{ListEntity, ReferenceData, ReferenceNeeds};
use crate::{
    config::Endpoints,
    definition::{ControlStyle, FilterDefinition},
    model::Program,
    result::DefinitionResult,
};

pub const ACTIVE: &str = "active";

impl ListEntity for Program {
    const NAME: &'static str = "program";
    const NEEDS: ReferenceNeeds = ReferenceNeeds {
        programs: false,
        assay_types: false,
    };

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.programs
    }

    fn definition(_reference: &ReferenceData) -> DefinitionResult<FilterDefinition<Self>> {
        FilterDefinition::builder()
            .flag(ACTIVE, "Status", ControlStyle::Radio, Some(true), |p: &Program| p.active)
            .build()
    }
}
