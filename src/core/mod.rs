pub mod country;
pub mod metrics;
pub mod primitives;
pub mod projection;
pub mod records;
pub mod relationship;
pub mod revenue;
pub mod scale;
pub mod stream;
pub mod types;

pub use country::canonical_country;
pub use metrics::{MetricSeries, YearlyConflictMetrics, metric_series, yearly_metrics};
pub use projection::{
    GeoProjection, MercatorProjection, ZoomTransform, ZoomedProjection, planar_centroid,
};
pub use records::{EventRecord, GdpSeries, RevenueRecord};
pub use relationship::{ChordEnd, ChordGroup, ChordLayout, ChordRibbon, RelationshipMatrix, chord_layout};
pub use revenue::{
    CompanyRevenue, CountryRevenue, ShareSlice, company_shares, country_totals,
    highlighted_first_shares, revenue_by_country,
};
pub use scale::{BandScale, LinearScale, SqrtScale};
pub use stream::{StackedLayer, stack_silhouette};
pub use types::{ChartId, EntityKey, EventType, EventTypeSet, Viewport, YearRange};
