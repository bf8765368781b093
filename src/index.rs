pub mod dimension;
pub mod field;

use std::sync::Arc;

pub type Extractor<T> = Arc<dyn Fn(&T) -> field::Projection + Send + Sync>;
