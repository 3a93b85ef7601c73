//! Capability gating for authenticated callers.
//!
//! Token parsing lives outside the domain. Whatever boundary authenticates a
//! request hands the engine an [`Actor`]; every operation then checks the
//! actor's role against the [`Capability`] it needs before touching state.
//! Ownership checks (a student's own subscription, an owner's own mess) are
//! layered on top by the services.

use serde::{Deserialize, Serialize};

use super::{Error, Role, UserId};

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    RegisterMess,
    UpdateMenu,
    ListOwnMesses,
    VerifyMess,
    ListAllMesses,
    ListUsers,
    SubmitRating,
    Subscribe,
    ManageOwnSubscriptions,
    FileComplaint,
    ViewMessComplaints,
    ListAllComplaints,
    ResolveComplaint,
    SendWarning,
    ViewOwnerDashboard,
    ViewAdminDashboard,
}

impl Role {
    /// Whether this role may exercise `capability`.
    ///
    /// # Examples
    /// ```
    /// use smart_mess::domain::{Capability, Role};
    ///
    /// assert!(Role::Admin.permits(Capability::VerifyMess));
    /// assert!(!Role::Owner.permits(Capability::VerifyMess));
    /// ```
    pub const fn permits(self, capability: Capability) -> bool {
        use Capability as C;
        match self {
            Self::Student => matches!(
                capability,
                C::SubmitRating | C::Subscribe | C::ManageOwnSubscriptions | C::FileComplaint
            ),
            Self::Owner => matches!(
                capability,
                C::RegisterMess
                    | C::UpdateMenu
                    | C::ListOwnMesses
                    | C::ViewMessComplaints
                    | C::ViewOwnerDashboard
            ),
            Self::Admin => matches!(
                capability,
                C::VerifyMess
                    | C::ListAllMesses
                    | C::ListUsers
                    | C::ViewMessComplaints
                    | C::ListAllComplaints
                    | C::ResolveComplaint
                    | C::SendWarning
                    | C::ViewAdminDashboard
            ),
        }
    }
}

/// Authenticated identity presented with each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Fail with [`ErrorCode::Forbidden`](super::ErrorCode::Forbidden) unless
    /// the actor's role grants `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), Error> {
        if self.role.permits(capability) {
            return Ok(());
        }
        Err(Error::forbidden(format!(
            "role {} may not perform {capability:?}",
            self.role
        )))
    }

    /// Fail with a forbidden error unless the actor is `owner`.
    pub fn require_self(&self, owner: &UserId, what: &str) -> Result<(), Error> {
        if &self.user_id == owner {
            return Ok(());
        }
        Err(Error::forbidden(format!("{what} belongs to another user")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the capability table.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(Role::Student, Capability::Subscribe, true)]
    #[case(Role::Student, Capability::RegisterMess, false)]
    #[case(Role::Owner, Capability::RegisterMess, true)]
    #[case(Role::Owner, Capability::SubmitRating, false)]
    #[case(Role::Owner, Capability::ViewMessComplaints, true)]
    #[case(Role::Admin, Capability::ViewMessComplaints, true)]
    #[case(Role::Admin, Capability::Subscribe, false)]
    #[case(Role::Admin, Capability::SendWarning, true)]
    fn capability_table(#[case] role: Role, #[case] capability: Capability, #[case] allowed: bool) {
        assert_eq!(role.permits(capability), allowed);
    }

    #[rstest]
    fn require_reports_forbidden() {
        let actor = Actor::new(UserId::random(), Role::Student);
        let err = actor
            .require(Capability::VerifyMess)
            .expect_err("students cannot verify");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn require_self_distinguishes_owners() {
        let actor = Actor::new(UserId::random(), Role::Student);
        assert!(actor.require_self(&actor.user_id.clone(), "subscription").is_ok());
        let err = actor
            .require_self(&UserId::random(), "subscription")
            .expect_err("foreign resource");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
