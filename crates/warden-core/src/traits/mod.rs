//! Traits (ports) - interfaces the infrastructure layers implement
//!
//! The domain defines what it needs from persistence, the platform client,
//! the identity resolver and the announcement sink; the outer crates (and
//! test mocks) provide the implementations.

mod notify;
mod platform;
mod store;

pub use notify::{Announcement, NotificationSink};
pub use platform::{Activation, IdentityResolver, PlatformClient, PlatformResult};
pub use store::{ActionStore, RepoResult};
