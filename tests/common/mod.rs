#![allow(dead_code)]

use std::path::Path;

use dashgraph::fs::FileSystem;
use dashgraph::model::Generation;

pub use dashgraph_test_utils::builders::{ConfigTreeBuilder, VALID_DATA_SOURCES, VALID_SETTINGS};
pub use dashgraph_test_utils::harness::Harness;
pub use dashgraph_test_utils::init_tracing;

pub const MAIN: &str = r#"
[dashboard]
title = "Home"

[[card]]
name = "search"
type = "search"
provider = "DuckDuckGo"

[[card]]
name = "clock"
type = "clock"
"#;

pub const MEDIA: &str = r#"
[[card]]
name = "plex"
type = "link"
url = "http://plex.local"
"#;

/// Every dashboard of `generation` belongs to it.
pub fn assert_consistent(generation: &Generation) {
    for dboard in generation.dashboards() {
        assert_eq!(
            dboard.generation(),
            generation.id(),
            "dashboard {} is from another generation",
            dboard.name()
        );
    }
}

pub fn dashboard_names(generation: &Generation) -> Vec<String> {
    generation.dashboard_names().map(str::to_string).collect()
}

pub fn read(fs: &dyn FileSystem, path: &Path) -> String {
    fs.read_to_string(path).unwrap()
}
