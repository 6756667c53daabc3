mod event_csv;
mod gdp_csv;
mod geometry;
mod loader;
mod revenue_csv;
mod source;
mod tables;

pub use event_csv::parse_event_csv;
pub use gdp_csv::parse_gdp_csv;
pub use geometry::{CountryShape, Ring, WorldGeometry, parse_world_geometry};
pub use loader::DatasetLoader;
pub use revenue_csv::parse_revenue_csv;
#[cfg(feature = "http-source")]
pub use source::HttpSource;
pub use source::{DataPaths, DataSource, FileSource, SourceDescriptor, StaticSource, is_remote};
pub use tables::{DatasetKind, DatasetKinds, Datasets, ParsedTable, Table};
