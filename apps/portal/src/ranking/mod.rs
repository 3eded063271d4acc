pub mod analytics;
pub mod classifier;
pub mod export;
pub mod filters;
pub mod handlers;
pub mod paginator;
pub mod presets;
pub mod sorter;
pub mod workspace;
