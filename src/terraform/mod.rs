pub mod cli;
pub mod hcl;
pub mod tfvars;

pub use cli::{TerraformCli, TerraformOutput};

/// File names inside a run's working directory.
pub const MAIN_TF_FILE: &str = "main.tf";
pub const VARIABLES_TF_FILE: &str = "variables.tf";
pub const TFVARS_FILE: &str = "terraform.tfvars";
pub const PLAN_FILE: &str = "apply.tfplan";
pub const PLAN_TEXT_FILE: &str = "plan.txt";
