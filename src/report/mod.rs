// Reporting: pure transformations of a finished SweepResult.

pub mod snapshot;
pub mod summary;

pub use snapshot::Snapshot;
pub use summary::{print_detail, print_overview, print_summary, sido_totals, summary_rows};
