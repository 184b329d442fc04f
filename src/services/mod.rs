mod provision_service;
mod sync_service;
mod template_service;

pub use provision_service::{PlanOutcome, ProvisionService};
pub use sync_service::{PROVIDER_AZURE, SyncService, SyncStats};
pub use template_service::TemplateService;
