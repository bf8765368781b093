//! List view binding: loads an entity collection with its reference data,
//! then wires the filter store, the index and the sidebar controls together.

pub mod controls;
pub mod phase;

use super::{
    client::{Backend, fetch_collection},
    codec,
    config::Config,
    definition::FilterDefinition,
    engine::{FilterEngine, ResultSink},
    entity::{ListEntity, ReferenceData},
    errors::ViewError,
    filter::{EntityIndex, IndexStats},
    model::{AssayType, Program},
    result::ViewResult,
    state::FilterState,
    store::{FilterStore, NavigationSink},
};
use arc_swap::ArcSwapOption;
use controls::{Control, Interaction, build_controls};
use parking_lot::RwLock;
use phase::ViewPhase;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::{debug, info, warn};

struct ReadyView<T>
where
    T: Send + Sync + 'static,
{
    definition: FilterDefinition<T>,
    store: FilterStore,
    engine: Arc<FilterEngine<T>>,
}

pub struct ListView<T>
where
    T: ListEntity,
{
    backend: Arc<dyn Backend>,
    config: Arc<Config>,
    navigation: Arc<dyn NavigationSink>,
    sink: Option<Arc<dyn ResultSink<T>>>,
    current_user: Option<i64>,
    phase: RwLock<ViewPhase>,
    epoch: AtomicU64,
    ready: ArcSwapOption<ReadyView<T>>,
}

impl<T> ListView<T>
where
    T: ListEntity,
{
    pub fn new(backend: Arc<dyn Backend>, config: Arc<Config>, navigation: Arc<dyn NavigationSink>) -> Self {
        Self {
            backend,
            config,
            navigation,
            sink: None,
            current_user: None,
            phase: RwLock::new(ViewPhase::Uninitialized),
            epoch: AtomicU64::new(0),
            ready: ArcSwapOption::empty(),
        }
    }

    pub fn with_current_user(mut self, user_id: Option<i64>) -> Self {
        self.current_user = user_id;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ResultSink<T>>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase.read().clone()
    }

    /// Loads the collection and reference data, then seeds the filter state
    /// from `query` and runs the first filter pass.
    ///
    /// Returns [`ViewError::Unmounted`] when the view was unmounted or mounted
    /// again while the fetches were in flight; the late data is dropped.
    pub async fn mount(&self, query: &str) -> ViewResult<()> {
        let epoch = {
            let mut phase = self.phase.write();
            self.ready.store(None);
            *phase = ViewPhase::LoadingReferenceData;
            self.epoch.fetch_add(1, Ordering::SeqCst) + 1
        };
        debug!(entity = T::NAME, epoch, "mounting list view");

        let loaded = self.load().await;

        let mut phase = self.phase.write();
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!(entity = T::NAME, epoch, "discarding data for a stale mount");
            return Err(ViewError::Unmounted);
        }
        let ready = match loaded.and_then(|(items, reference)| self.assemble(items, &reference, query)) {
            Ok(ready) => Arc::new(ready),
            Err(e) => {
                warn!(entity = T::NAME, error = %e, "list view failed to load");
                *phase = ViewPhase::Error(e.to_string());
                return Err(e);
            }
        };
        self.ready.store(Some(Arc::clone(&ready)));
        *phase = ViewPhase::Ready;
        drop(phase);

        let rows = ready.engine.refresh(&ready.store.snapshot());
        info!(entity = T::NAME, total = ready.engine.index().len(), visible = rows.len(), "list view ready");
        Ok(())
    }

    async fn load(&self) -> ViewResult<(Vec<T>, ReferenceData)> {
        let timeout = self.config.backend.request_timeout();
        let endpoints = &self.config.endpoints;
        let backend = self.backend.as_ref();

        let items = fetch_collection::<T>(backend, T::endpoint(endpoints), timeout);
        let programs = async {
            if T::NEEDS.programs {
                fetch_collection::<Program>(backend, &endpoints.programs, timeout).await
            } else {
                Ok(Vec::new())
            }
        };
        let assay_types = async {
            if T::NEEDS.assay_types {
                fetch_collection::<AssayType>(backend, &endpoints.assay_types, timeout).await
            } else {
                Ok(Vec::new())
            }
        };
        let (items, programs, assay_types) = futures::try_join!(items, programs, assay_types)?;

        Ok((items, ReferenceData {
            programs,
            assay_types,
            current_user: self.current_user,
        }))
    }

    fn assemble(&self, items: Vec<T>, reference: &ReferenceData, query: &str) -> ViewResult<ReadyView<T>> {
        let definition = T::definition(reference)?;
        let index = EntityIndex::build(items, &definition)?;
        let engine = Arc::new(FilterEngine::new(index, self.sink.clone()));

        let initial = codec::decode(query, definition.schema());
        let store = FilterStore::with_initial(
            Arc::clone(definition.schema()),
            Arc::clone(&self.navigation),
            &initial,
        )?;
        let subscriber = Arc::clone(&engine);
        store.subscribe(move |state| {
            subscriber.refresh(state);
        });

        Ok(ReadyView {
            definition,
            store,
            engine,
        })
    }

    /// Drops the loaded data. In-flight mounts resolve to
    /// [`ViewError::Unmounted`].
    pub fn unmount(&self) {
        let mut phase = self.phase.write();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.ready.store(None);
        *phase = ViewPhase::Uninitialized;
        debug!(entity = T::NAME, "list view unmounted");
    }

    fn ready(&self) -> ViewResult<Arc<ReadyView<T>>> {
        self.ready.load_full().ok_or(ViewError::NotReady)
    }

    pub fn update(&self, partial: &FilterState) -> ViewResult<Arc<FilterState>> {
        Ok(self.ready()?.store.update(partial)?)
    }

    pub fn reset(&self) -> ViewResult<Arc<FilterState>> {
        Ok(self.ready()?.store.reset())
    }

    pub fn interact(&self, interaction: &Interaction) -> ViewResult<Arc<FilterState>> {
        let ready = self.ready()?;
        let current = ready.store.snapshot();
        match interaction.partial(ready.store.schema(), &current)? {
            Some(partial) => Ok(ready.store.update(&partial)?),
            None => Ok(ready.store.reset()),
        }
    }

    /// Visible rows in collection order; `None` while loading.
    pub fn results(&self) -> Option<Arc<Vec<Arc<T>>>> {
        self.ready.load_full().map(|ready| ready.engine.results())
    }

    pub fn filter_state(&self) -> Option<Arc<FilterState>> {
        self.ready.load_full().map(|ready| ready.store.snapshot())
    }

    pub fn query_string(&self) -> Option<String> {
        self.ready.load_full().map(|ready| ready.store.query_string())
    }

    pub fn controls(&self) -> ViewResult<Vec<Control>> {
        let ready = self.ready()?;
        let index = ready.engine.index();
        Ok(build_controls(ready.definition.schema(), &ready.store.snapshot(), Some(index.as_ref())))
    }

    pub fn stats(&self) -> Option<IndexStats> {
        self.ready.load_full().map(|ready| ready.engine.index().stats())
    }
}
