//! Partner portal core: session lifecycle, access guard, backend records and
//! the view controllers that sit between them.

pub mod aggregate;
pub mod api;
pub mod clock;
pub mod commission;
pub mod config;
pub mod error;
pub mod guard;
#[cfg(feature = "tracing-subscriber")]
pub mod logging;
pub mod session;
pub mod storage;
pub mod types;
pub mod validation;
pub mod views;

pub use api::{ApiError, PortalApi};
pub use clock::{Clock, ManualClock, SystemClock};
pub use commission::{CommissionConfig, CommissionRule, CommissionType, TransactionType};
pub use config::{PortalConfig, SessionConfig};
pub use error::{CoreError, CoreResult};
pub use guard::{AuthGuard, AuthHeaders, LoginRoute};
pub use session::{RemainingTime, SessionStore};
pub use storage::{KeyValueStorage, MemoryStorage};
pub use types::{
    ApiEnvelope, ApiOutcome, InsuranceApplication, InsurancePlan, LoginRequest, LoginResponse,
    UserProfile, UserRecord,
};
pub use views::{ViewError, ViewState};
