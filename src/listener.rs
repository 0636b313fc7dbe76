//! Listeners reacting to domain events.

pub mod remote_wipe;
pub mod share_created;

pub use self::remote_wipe::RemoteWipeListener;
pub use self::share_created::ShareCreatedEventListener;
