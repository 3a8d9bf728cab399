use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use dashgraph::config::Layout;
use dashgraph::engine::ReloadRequest;
use dashgraph::fs::mock::MockFileSystem;
use dashgraph::orchestrator::{Orchestrator, Services};

use crate::builders::ConfigTreeBuilder;
use crate::fake_compiler::FakeThemeCompiler;
use crate::fake_watch::FakeWatchBackend;

/// An orchestrator over an in-memory tree with fake watch and compile
/// collaborators, plus handles to all of them.
pub struct Harness {
    pub fs: MockFileSystem,
    pub layout: Layout,
    pub watcher: FakeWatchBackend,
    pub compiler: FakeThemeCompiler,
    pub orchestrator: Arc<Orchestrator>,
    pub requests: mpsc::UnboundedReceiver<ReloadRequest>,
    /// Same channel the watch callbacks send on.
    pub sender: mpsc::UnboundedSender<ReloadRequest>,
}

impl Harness {
    pub fn new(tree: ConfigTreeBuilder) -> Self {
        let (fs, layout) = tree.build();
        let watcher = FakeWatchBackend::new();
        let compiler = FakeThemeCompiler::new();
        let (tx, requests) = mpsc::unbounded_channel();

        let services = Services {
            fs: Arc::new(fs.clone()),
            compiler: Arc::new(compiler.clone()),
            watcher: Arc::new(watcher.clone()),
        };
        let orchestrator = Arc::new(
            Orchestrator::new(layout.clone(), services, tx.clone()).expect("valid default layout"),
        );

        Self {
            fs,
            layout,
            watcher,
            compiler,
            orchestrator,
            requests,
            sender: tx,
        }
    }

    pub fn dashboard_path(&self, name: &str) -> PathBuf {
        self.layout.dashboards_dir().join(format!("{name}.toml"))
    }

    /// All requests queued so far.
    pub fn drain_requests(&mut self) -> Vec<ReloadRequest> {
        let mut out = Vec::new();
        while let Ok(req) = self.requests.try_recv() {
            out.push(req);
        }
        out
    }
}
