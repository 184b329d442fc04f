pub mod inventory;
pub mod run;
pub mod template;

pub use inventory::{CloudConfig, ResourceGroup, VirtualMachine, VmStatus};
pub use run::{ProvisioningRun, RunStatus};
pub use template::Template;
