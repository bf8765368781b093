use super::errors::{
    DefinitionError,
    FetchError,
    GlobalError,
    IndexError,
    StoreError,
    ViewError,
};

pub type DefinitionResult<T> = Result<T,DefinitionError>;
pub type IndexResult<T> = Result<T,IndexError>;
pub type StoreResult<T> = Result<T,StoreError>;
pub type FetchResult<T> = Result<T,FetchError>;
pub type ViewResult<T> = Result<T,ViewError>;
pub type GlobalResult<T> = Result<T,GlobalError>;
