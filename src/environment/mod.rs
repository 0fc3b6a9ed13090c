// Isolated interpreter environment
//
// - Layout: platform-specific paths inside a virtual environment
// - Manager: creation and forced recreation of the environment directory

pub mod layout;
pub mod manager;

pub use layout::{EnvironmentLayout, Platform};
pub use manager::EnvironmentManager;
