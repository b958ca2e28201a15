pub mod import;
pub mod matcher;
pub mod policy;
pub mod reconcile;
