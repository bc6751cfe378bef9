pub mod dashboard_service;
pub mod profile_enricher;
pub mod profile_html;
pub mod record_source;
