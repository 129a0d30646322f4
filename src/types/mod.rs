pub mod activity;
pub mod metrics;
pub mod stats;
pub mod track;
