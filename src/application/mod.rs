pub mod use_cases;

pub use use_cases::flow_catalog::FlowCatalog;
pub use use_cases::pivot_builder::build_pivot;
pub use use_cases::report_aggregator::{AggregateLimits, ReportAggregator};
