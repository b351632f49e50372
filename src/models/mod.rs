pub mod client;
pub mod employment;
pub mod filters;
pub mod role;
pub mod user;

pub use client::{Client, ClientForm};
pub use employment::{Employment, EmploymentDetail, EmploymentForm, EmploymentStatus};
pub use filters::{EmploymentFilters, UserFilters};
pub use role::Role;
pub use user::{AuthedUser, User};
