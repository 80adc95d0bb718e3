pub mod flow_catalog;
pub mod pivot_builder;
pub mod report_aggregator;
