use super::{ListEntity, ReferenceData, ReferenceNeeds, status_options};
use crate::{
    config::Endpoints,
    definition::{ControlStyle, FilterDefinition},
    index::field::{optional, single},
    model::{Assay, is_member},
    result::DefinitionResult,
};

pub const STATUS: &str = "status";
pub const ASSAY_TYPE: &str = "assayType";
pub const PROGRAM: &str = "program";
pub const MY_ASSAY: &str = "myAssay";

impl ListEntity for Assay {
    const NAME: &'static str = "assay";
    const NEEDS: ReferenceNeeds = ReferenceNeeds {
        programs: true,
        assay_types: true,
    };

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.assays
    }

    fn definition(reference: &ReferenceData) -> DefinitionResult<FilterDefinition<Self>> {
        let current_user = reference.current_user;
        FilterDefinition::builder()
            .string_set(STATUS, "Status", status_options(), |a: &Assay| single(a.status.as_str()))
            .integer_set(ASSAY_TYPE, "Assay Type", reference.assay_type_options(), |a: &Assay| {
                optional(a.assay_type.as_ref().map(|t| t.id))
            })
            // программа берётся из исследования, к которому относится эксперимент
            .integer_set(PROGRAM, "Program", reference.program_options(), |a: &Assay| {
                optional(a.study.as_ref().and_then(|s| s.program.as_ref()).map(|p| p.id))
            })
            .flag(MY_ASSAY, "My Assays", ControlStyle::Checkbox, None, move |a: &Assay| {
                current_user.is_some_and(|user| is_member(a.owner.as_ref(), &a.users, user))
            })
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        definition::FilterValue,
        filter::EntityIndex,
        model::{AssayType, AssayTypeRef, Program, ProgramRef, Status, StudyRef, UserRef},
        state::FilterState,
    };

    fn assay(id: i64, assay_type: i64, program: Option<i64>) -> Assay {
        Assay {
            id,
            code: format!("A-{id}"),
            name: format!("Assay {id}"),
            status: Status::Active,
            assay_type: Some(AssayTypeRef { id: assay_type, name: None }),
            study: Some(StudyRef {
                id: 100 + id,
                code: None,
                program: program.map(|id| ProgramRef { id, name: None }),
            }),
            active: true,
            owner: None,
            users: vec![UserRef { id: 5, display_name: None }],
        }
    }

    #[test]
    fn test_program_comes_from_parent_study() {
        let reference = ReferenceData {
            programs: vec![Program { id: 10, name: "A".into(), code: None, active: true }],
            assay_types: vec![
                AssayType { id: 1, name: "Histology".into(), active: true },
                AssayType { id: 2, name: "Imaging".into(), active: true },
            ],
            current_user: Some(5),
        };
        let def = Assay::definition(&reference).unwrap();
        assert_eq!(def.schema().keys().collect::<Vec<_>>(), vec![STATUS, ASSAY_TYPE, PROGRAM, MY_ASSAY]);

        let index = EntityIndex::build(vec![assay(1, 1, Some(10)), assay(2, 2, None), assay(3, 2, Some(10))], &def).unwrap();
        let state = FilterState::new()
            .with(PROGRAM, FilterValue::IntSet(vec![10]))
            .with(ASSAY_TYPE, FilterValue::IntSet(vec![2]))
            .with(MY_ASSAY, FilterValue::Bool(true));
        let ids: Vec<i64> = index.apply_filters(&state).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3]);
    }
}
