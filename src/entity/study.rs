use super::{ListEntity, ReferenceData, ReferenceNeeds, status_options};
use crate::{
    config::Endpoints,
    definition::{ControlStyle, FilterDefinition},
    index::field::{optional, single},
    model::{Study, is_member},
    result::DefinitionResult,
};

pub const STATUS: &str = "status";
pub const PROGRAM: &str = "program";
pub const LEGACY: &str = "legacy";
pub const EXTERNAL: &str = "external";
pub const MY_STUDY: &str = "myStudy";

impl ListEntity for Study {
    const NAME: &'static str = "study";
    const NEEDS: ReferenceNeeds = ReferenceNeeds {
        programs: true,
        assay_types: false,
    };

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.studies
    }

    fn definition(reference: &ReferenceData) -> DefinitionResult<FilterDefinition<Self>> {
        let current_user = reference.current_user;
        FilterDefinition::builder()
            .string_set(STATUS, "Status", status_options(), |s: &Study| single(s.status.as_str()))
            .integer_set(PROGRAM, "Program", reference.program_options(), |s: &Study| {
                optional(s.program.as_ref().map(|p| p.id))
            })
            .flag(LEGACY, "Legacy Studies", ControlStyle::Checkbox, None, |s: &Study| s.legacy)
            .flag(EXTERNAL, "External Studies", ControlStyle::Checkbox, None, |s: &Study| {
                s.collaborator.is_some()
            })
            .flag(MY_STUDY, "My Studies", ControlStyle::Checkbox, None, move |s: &Study| {
                current_user.is_some_and(|user| is_member(s.owner.as_ref(), &s.users, user))
            })
            .build()
    }
}
