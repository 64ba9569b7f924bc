pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateProteinCommand, CreateProteinError};
pub use delete::{DeleteProteinCommand, DeleteProteinError};
pub use update::{UpdateProteinCommand, UpdateProteinError};
