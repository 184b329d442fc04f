pub mod azure;
pub mod run;
pub mod template;
