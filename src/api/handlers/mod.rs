pub mod azure;
pub mod health;
pub mod run;
pub mod template;
