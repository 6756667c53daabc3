use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Fetch or parse failure of one dataset source.
///
/// A load error is terminal for the visualization section that depends on the
/// source; sibling sections keep rendering.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{source_name}`: {reason}")]
    Io { source_name: String, reason: String },

    #[error("failed to fetch `{source_name}`: {reason}")]
    Http { source_name: String, reason: String },

    #[error("malformed csv in `{source_name}`: {reason}")]
    Csv { source_name: String, reason: String },

    #[error("malformed json in `{source_name}`: {reason}")]
    Json { source_name: String, reason: String },

    #[error("`{source_name}` has no `{object}` object")]
    MissingObject { source_name: String, object: String },

    #[error("`{source_name}` has no `{column}` column")]
    MissingColumn { source_name: String, column: String },

    #[error("{failed} of {requested} joined fetches failed, first: {first}")]
    Join {
        requested: usize,
        failed: usize,
        first: Box<LoadError>,
    },
}

impl LoadError {
    #[must_use]
    pub fn source_name(&self) -> &str {
        match self {
            Self::Io { source_name, .. }
            | Self::Http { source_name, .. }
            | Self::Csv { source_name, .. }
            | Self::Json { source_name, .. }
            | Self::MissingObject { source_name, .. }
            | Self::MissingColumn { source_name, .. } => source_name,
            Self::Join { first, .. } => first.source_name(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("chart `{0}` is already registered")]
    DuplicateChart(String),

    #[error("unknown chart `{0}`")]
    UnknownChart(String),

    #[error("a redraw pass is already in progress")]
    RedrawInProgress,

    #[error("chart `{0}` does not accept relayed interactions")]
    UnsupportedRelay(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}
