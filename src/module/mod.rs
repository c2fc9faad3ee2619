pub mod config;
pub mod error;
pub mod manager;
pub mod registry;
pub mod state;
pub mod traits;

pub use config::{ApplicationConfig, ModuleConfig};
pub use error::ModuleError;
pub use manager::{ModuleHandle, ModuleManager};
pub use registry::{ModuleDefine, ModuleRegistry};
pub use state::ModulePhase;
pub use traits::Module;
