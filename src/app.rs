use std::sync::Arc;

use tracing::{info, warn};

use crate::aggregator::RatingAggregator;
use crate::catalog::{CatalogIndex, CatalogStore};
use crate::config::Config;
use crate::error::Result;
use crate::planetterp::PlanetTerpClient;
use crate::session::{LookupRequest, SearchSession};
use crate::view::InstructorPanel;

/// Wires the catalog, the API client and the aggregator together.
pub struct App {
    config: Config,
    catalog: CatalogStore,
    aggregator: RatingAggregator<PlanetTerpClient>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = PlanetTerpClient::from_config(&config)?;
        Ok(Self {
            config,
            catalog: CatalogStore::new(),
            aggregator: RatingAggregator::new(client),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn aggregator(&self) -> &RatingAggregator<PlanetTerpClient> {
        &self.aggregator
    }

    /// Load (or reload) the catalog. On failure the previous catalog, empty
    /// at startup, stays in place and search keeps working against it.
    pub async fn load_catalog(&self) -> Arc<CatalogIndex> {
        let source = self.config.catalog_source();
        match self
            .catalog
            .reload(&source, self.aggregator.source().http())
            .await
        {
            Ok(index) => index,
            Err(e) => {
                warn!("Search will use the previous catalog: {}", e);
                self.catalog.snapshot()
            }
        }
    }

    pub fn catalog(&self) -> Arc<CatalogIndex> {
        self.catalog.snapshot()
    }

    pub fn new_session(&self) -> SearchSession {
        SearchSession::new(self.catalog.snapshot())
    }

    /// Run a lookup and install the result if the session still shows the
    /// same selection.
    pub async fn complete_lookup(
        &self,
        session: &mut SearchSession,
        request: LookupRequest,
    ) -> bool {
        let panel: InstructorPanel = request.run(&self.aggregator).await;
        let applied = session.apply_panel(request.token, panel);
        if applied {
            info!("Displayed instructors for {}", request.course.course_code);
        }
        applied
    }
}
