pub mod config;
pub mod dataset;
pub mod deltas;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod ranking;
pub mod report;
pub mod series;
pub mod session;
pub mod types;
pub mod util;

pub use dataset::Dataset;
pub use deltas::compute_deltas;
pub use normalize::{normalize, normalize_row};
pub use ranking::rank_edition;
pub use report::{render_ranking, write_artifact};
pub use series::{build_series, Series};
pub use session::{AccessRegistry, Principal, SchoolSelection, Session};
