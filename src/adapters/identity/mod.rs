//! Identity service integration for EC2 test credentials

pub mod keystone;
pub mod traits;

pub use keystone::KeystoneCredentialStore;
pub use traits::{CredentialStore, Ec2Credential};
