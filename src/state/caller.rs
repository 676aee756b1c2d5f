use crate::{
    dao::models::{ChannelId, UserId},
    error::ServiceError,
};

/// Identity of whoever issued the current command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Platform user id.
    pub user_id: UserId,
    /// Whether the caller holds contest admin rights.
    pub is_admin: bool,
    /// Channel the command was issued from, when known.
    pub channel_id: Option<ChannelId>,
}

impl Caller {
    /// Fail with [`ServiceError::PermissionDenied`] unless the caller is an admin.
    pub fn require_admin(&self, action: &'static str) -> Result<(), ServiceError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied { action })
        }
    }
}
