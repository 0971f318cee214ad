//! Request/response models

pub mod scan;

pub use scan::{HealthResponse, ScanMode, ScanRequest, ScanResult, ServiceInfo};
