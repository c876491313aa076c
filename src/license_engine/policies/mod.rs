pub mod change_actions;
pub mod license_catalog;
pub mod license_family;

pub use change_actions::ChangeActions;
pub use license_catalog::LicenseCatalog;
pub use license_family::{license_version, LicenseFamily};
