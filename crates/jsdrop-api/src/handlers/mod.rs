pub mod bundle_upload;
pub mod health;
