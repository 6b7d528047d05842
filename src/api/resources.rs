//! The five resources the gateway exposes and how each maps onto its
//! upstream table.

use std::fmt;

/// A logical resource backed by one upstream table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Platforms,
    Workspaces,
    Conversations,
    Messages,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Users,
        Resource::Platforms,
        Resource::Workspaces,
        Resource::Conversations,
        Resource::Messages,
    ];

    /// Path segment under the gateway mount.
    pub fn segment(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Platforms => "platforms",
            Resource::Workspaces => "workspaces",
            Resource::Conversations => "conversations",
            Resource::Messages => "messages",
        }
    }

    /// Upstream table name. These are not always the plural segment.
    pub fn table(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Platforms => "platform",
            Resource::Workspaces => "projects",
            Resource::Conversations => "conversation",
            Resource::Messages => "messages",
        }
    }

    /// Fixed row cap for list requests.
    pub fn list_limit(&self) -> u32 {
        match self {
            Resource::Users => 10,
            Resource::Platforms | Resource::Workspaces | Resource::Conversations => 20,
            Resource::Messages => 50,
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.segment() == segment)
    }

    /// Tables counted by `/stats`, in catalogue order.
    pub fn tables() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(|r| r.table())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}
