use shade_core::UserId;

/// Session context for a request.
///
/// Inserted by the session-cookie middleware and read by the `/events`
/// handlers. The extension map is keyed by this type, so the value cannot
/// collide with — or be forged through — a user-supplied header or query
/// parameter named `user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: UserId,
}

impl SessionContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
