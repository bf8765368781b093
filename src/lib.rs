pub mod errors;
pub mod result;
pub mod index;
pub mod definition;
pub mod state;
pub mod codec;
pub mod store;
pub mod filter;
pub mod engine;
pub mod model;
pub mod config;
pub mod client;
pub mod entity;
pub mod view;

pub use index::field::{
    FieldOperation,
    FieldValue,
    Projection,
};

pub use definition::{
    ControlStyle,
    FieldSpec,
    FilterDefinition,
    FilterOption,
    FilterSchema,
    FilterValue,
    ValueKind,
};
pub use state::FilterState;
pub use store::{FilterStore, NavigationSink};
pub use filter::EntityIndex;
pub use engine::{FilterEngine, ResultSink};
pub use entity::{ListEntity, ReferenceData};
pub use client::{Backend, HttpBackend};
pub use config::Config;
pub use view::{ListView, controls::Interaction, phase::ViewPhase};
