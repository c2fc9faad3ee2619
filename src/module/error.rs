use super::ModulePhase;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleError {
    /// Configured module names with no matching discovered implementation.
    /// Collected across the whole configuration so operators see every miss
    /// in one error.
    #[error("modules not found: {}", names.join(", "))]
    ModuleNotFound { names: Vec<String> },

    /// A module requires another module that is not part of the boot set
    #[error("module '{module}' requires provider '{provider}', which is not loaded")]
    ProviderNotFound { module: String, provider: String },

    /// A service was requested that the target module never registered
    /// during `prepare` (or registered under a different type)
    #[error("module '{module}' does not provide service '{service}'")]
    ServiceNotProvided { module: String, service: String },

    /// A lifecycle hook exceeded the configured boot timeout
    #[error("module '{module}' timed out after {seconds}s while entering phase '{phase}'")]
    PhaseTimeout {
        module: String,
        phase: ModulePhase,
        seconds: u64,
    },

    /// A module's own lifecycle hook failed
    #[error("module '{module}' failed while entering phase '{phase}'")]
    Lifecycle {
        module: String,
        phase: ModulePhase,
        #[source]
        source: anyhow::Error,
    },
}
