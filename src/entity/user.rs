use super::{ListEntity, ReferenceData, ReferenceNeeds};
use crate::{
    config::Endpoints,
    definition::{ControlStyle, FilterDefinition},
    model::User,
    result::DefinitionResult,
};

pub const ACTIVE: &str = "active";
pub const ADMIN: &str = "admin";

impl ListEntity for User {
    const NAME: &'static str = "user";
    const NEEDS: ReferenceNeeds = ReferenceNeeds {
        programs: false,
        assay_types: false,
    };

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.users
    }

    fn definition(_reference: &ReferenceData) -> DefinitionResult<FilterDefinition<Self>> {
        FilterDefinition::builder()
            .flag(ACTIVE, "Status", ControlStyle::Radio, Some(true), |u: &User| u.active)
            .flag(ADMIN, "Admins", ControlStyle::Checkbox, None, |u: &User| u.admin)
            .build()
    }
}
