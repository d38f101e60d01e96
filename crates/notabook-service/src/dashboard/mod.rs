//! Landing page figures.

pub mod service;

pub use service::{DashboardService, DashboardStats};
