//! Dashboards (OpenSearch Dashboards / Kibana) integration.

mod client;

pub use client::DashboardsClient;
