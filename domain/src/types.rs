use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub uuid::Uuid);

impl Default for ParticipantId {
    fn default() -> Self {
        ParticipantId::new()
    }
}

impl ParticipantId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        SessionId::new()
    }
}

/// Handle to a deferred callback, issued by whichever clock armed it.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    id: ParticipantId,
    nickname: String,
}

impl Participant {
    /// Mints a participant under a fresh identifier.
    #[must_use]
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            nickname: nickname.into(),
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }
}
