// ── User and group domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access level a user holds in one of their groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupAccess {
    Write,
    Execute,
}

impl GroupAccess {
    pub fn from_write_flag(write_access: bool) -> Self {
        if write_access {
            Self::Write
        } else {
            Self::Execute
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Execute => "execute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub name: String,
    pub access: GroupAccess,
}

/// Renders as `<group>-write` or `<group>-execute`.
impl fmt::Display for GroupMembership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.access.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Login name, distinct from the record id.
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub groups: Vec<GroupMembership>,
}

impl User {
    /// Group memberships as a space-separated `<group>-<access>` list.
    pub fn group_labels(&self) -> String {
        self.groups
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}
