// src/model/generation.rs

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::errors::LoadError;
use crate::model::card::SharedCards;
use crate::model::dashboard::Dashboard;
use crate::model::data_source::DataSourceHandler;
use crate::model::settings::{QueryProvider, Settings};

/// One complete, internally consistent version of the configuration graph.
///
/// A generation is published as a whole; readers holding an
/// `Arc<Generation>` never see a half-replaced dashboard map.
#[derive(Debug, Clone)]
pub struct Generation {
    id: u64,
    settings: Arc<Settings>,
    data_sources: Arc<DataSourceHandler>,
    shared_cards: Arc<SharedCards>,
    query_providers: Arc<Vec<QueryProvider>>,
    theme_error: Option<LoadError>,
    dashboards: BTreeMap<String, Arc<Dashboard>>,
    main_name: String,
    main: Arc<Dashboard>,
}

/// Everything a rebuild produced, before it is sealed into a [`Generation`].
#[derive(Debug)]
pub struct GenerationParts {
    pub id: u64,
    pub settings: Settings,
    pub data_sources: DataSourceHandler,
    pub shared_cards: SharedCards,
    pub query_providers: Arc<Vec<QueryProvider>>,
    pub theme_error: Option<LoadError>,
    pub dashboards: BTreeMap<String, Dashboard>,
}

impl Generation {
    /// Seal a rebuild's results. If `main_name` is not among the dashboards a
    /// placeholder carrying a missing-resource error stands in for it.
    pub fn assemble(parts: GenerationParts, main_name: &str, dashboards_dir: &Path) -> Self {
        let dashboards: BTreeMap<String, Arc<Dashboard>> = parts
            .dashboards
            .into_iter()
            .map(|(name, dboard)| (name, Arc::new(dboard)))
            .collect();

        let main = match dashboards.get(main_name) {
            Some(dboard) => Arc::clone(dboard),
            None => Arc::new(Dashboard::placeholder(main_name, dashboards_dir, parts.id)),
        };

        Self {
            id: parts.id,
            settings: Arc::new(parts.settings),
            data_sources: Arc::new(parts.data_sources),
            shared_cards: Arc::new(parts.shared_cards),
            query_providers: parts.query_providers,
            theme_error: parts.theme_error,
            dashboards,
            main_name: main_name.to_string(),
            main,
        }
    }

    /// The generation served before the first rebuild: default settings and
    /// only a placeholder main dashboard.
    pub fn empty(main_name: &str, dashboards_dir: &Path) -> Self {
        Self::assemble(
            GenerationParts {
                id: 0,
                settings: Settings::default(),
                data_sources: DataSourceHandler::default(),
                shared_cards: SharedCards::default(),
                query_providers: Arc::new(crate::model::default_query_providers()),
                theme_error: None,
                dashboards: BTreeMap::new(),
            },
            main_name,
            dashboards_dir,
        )
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn data_sources(&self) -> &Arc<DataSourceHandler> {
        &self.data_sources
    }

    pub fn shared_cards(&self) -> &Arc<SharedCards> {
        &self.shared_cards
    }

    /// The registry in effect: the settings override or the built-in one.
    pub fn query_providers(&self) -> &Arc<Vec<QueryProvider>> {
        &self.query_providers
    }

    /// Why the stylesheet was not regenerated in this generation, if it wasn't.
    pub fn theme_error(&self) -> Option<&LoadError> {
        self.theme_error.as_ref()
    }

    /// Dashboard names, sorted.
    pub fn dashboard_names(&self) -> impl Iterator<Item = &str> {
        self.dashboards.keys().map(|s| s.as_str())
    }

    pub fn dashboards(&self) -> impl Iterator<Item = &Arc<Dashboard>> {
        self.dashboards.values()
    }

    pub fn contains_dashboard(&self, name: &str) -> bool {
        self.dashboards.contains_key(name)
    }

    /// Exact-name lookup, falling back to the main dashboard. Never absent.
    pub fn get_dashboard_by_name(&self, name: &str) -> Arc<Dashboard> {
        match self.dashboards.get(name) {
            Some(dboard) => Arc::clone(dboard),
            None => Arc::clone(&self.main),
        }
    }

    /// Error that upstream sources stamp onto every dashboard. When both
    /// failed the data-source error wins, since it is stamped last.
    pub fn upstream_error(&self) -> Option<&LoadError> {
        self.data_sources.error().or(self.settings.error())
    }

    /// Copy of this generation with one dashboard replaced.
    pub fn with_dashboard(&self, dashboard: Dashboard) -> Self {
        let mut next = self.clone();
        let dashboard = Arc::new(dashboard);
        if dashboard.name() == next.main_name {
            next.main = Arc::clone(&dashboard);
        }
        next.dashboards.insert(dashboard.name().to_string(), dashboard);
        next
    }

    /// Copy of this generation with different settings and theme status.
    pub fn with_settings(&self, settings: Settings, theme_error: Option<LoadError>) -> Self {
        Self {
            settings: Arc::new(settings),
            theme_error,
            ..self.clone()
        }
    }
}
