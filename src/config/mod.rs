//! Configuration types and loading for upgrade-triage

mod backend;
mod loader;

pub use backend::BackendConfig;
#[allow(unused_imports)]
pub use loader::{Defaults, TriageConfig};
