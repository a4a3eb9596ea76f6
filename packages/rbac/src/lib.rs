// ABOUTME: Role-based access control for Planline
// ABOUTME: Static capability table, user accounts, and capability enforcement

pub mod error;
pub mod role;
pub mod storage;
pub mod user;


pub use error::{RbacError, RbacResult};
pub use role::{Capability, CapabilityGrant, Role};
pub use storage::UserStorage;
pub use user::{User, UserCreateInput};
