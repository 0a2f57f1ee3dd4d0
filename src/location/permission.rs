use crate::HomeboundError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionKind {
    FineLocation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Text shown to the user alongside the permission prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct PermissionRationale {
    pub title: String,
    pub message: String,
    pub button_positive: String,
}

impl PermissionRationale {
    pub fn location() -> Self {
        Self {
            title: "Location Permission".to_string(),
            message: "App needs access to your location for navigation".to_string(),
            button_positive: "OK".to_string(),
        }
    }
}

pub trait PermissionPrompter {
    fn request(
        &mut self,
        kind: PermissionKind,
        rationale: &PermissionRationale,
    ) -> Result<PermissionStatus, HomeboundError>;
}

/// Answers every request with the same status. Desktop platforms have no
/// runtime location prompt and use `Granted`.
pub struct StaticPermissionPrompter {
    status: PermissionStatus,
}

impl StaticPermissionPrompter {
    pub fn new(status: PermissionStatus) -> Self {
        Self { status }
    }
}

impl Default for StaticPermissionPrompter {
    fn default() -> Self {
        Self::new(PermissionStatus::Granted)
    }
}

impl PermissionPrompter for StaticPermissionPrompter {
    fn request(
        &mut self,
        _kind: PermissionKind,
        _rationale: &PermissionRationale,
    ) -> Result<PermissionStatus, HomeboundError> {
        Ok(self.status)
    }
}
