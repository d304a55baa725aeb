use super::{ViewState, settle};
use crate::api::PortalApi;
use crate::clock::Clock;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;
use crate::types::{UserProfile, UserRecord};
use tracing::debug;

/// Backend profile of the signed-in partner
///
/// A successful load merges the profile over the cached user, so verification
/// changes made since login reach the guard without logging in again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileController {
    pub state: ViewState,
    profile: Option<UserProfile>,
}

impl ProfileController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Fetch the profile and return the refreshed cached user
    pub async fn load<A, S, C>(
        &mut self,
        api: &A,
        session: &SessionStore<S, C>,
    ) -> Option<UserRecord>
    where
        A: PortalApi + ?Sized,
        S: KeyValueStorage,
        C: Clock,
    {
        self.state.begin();
        let result = settle(session, api.current_user().await);

        match self.state.finish(result)? {
            Some(profile) => {
                let user = session.update_user(profile.extra.clone());
                debug!(user_id = %profile.user_id, "Refreshed cached user from profile");
                self.profile = Some(profile);
                Some(user)
            }
            None => {
                self.profile = None;
                None
            }
        }
    }
}
