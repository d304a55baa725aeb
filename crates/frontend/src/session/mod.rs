mod context;
mod guard;

pub use context::{SessionAction, SessionContext, SessionProvider, use_session};
pub use guard::RequireSession;
