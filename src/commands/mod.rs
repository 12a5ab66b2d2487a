pub mod extract;
pub mod inventory;
pub mod plan;
pub mod run;
