// ── API-to-domain type conversions ──
//
// Bridges raw `oc_api::models` response types into `oc_core::model` domain
// types. Owner and topic are flattened out of their nested wire shapes;
// fields the CLI never renders are dropped here.

use oc_api::models::{
    DeviceResponse, GroupResponse, OwnerResponse, ServiceResponse, UserGroupResponse,
    UserResponse,
};

use crate::model::{Device, Group, GroupAccess, GroupMembership, Owner, Service, User};

impl From<OwnerResponse> for Owner {
    fn from(o: OwnerResponse) -> Self {
        Self {
            name: o.name,
            email: o.email,
        }
    }
}

impl From<UserGroupResponse> for GroupMembership {
    fn from(g: UserGroupResponse) -> Self {
        Self {
            name: g.name,
            access: GroupAccess::from_write_flag(g.write_access),
        }
    }
}

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: u.id,
            user_id: u.userid,
            name: u.name,
            email: u.email,
            groups: u.groups.into_iter().map(GroupMembership::from).collect(),
        }
    }
}

impl From<GroupResponse> for Group {
    fn from(g: GroupResponse) -> Self {
        Self {
            id: g.id,
            name: g.name,
        }
    }
}

impl From<ServiceResponse> for Service {
    fn from(s: ServiceResponse) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            owner: s.owner.into(),
            topic: s.pubsub.endpoint,
        }
    }
}

impl From<DeviceResponse> for Device {
    fn from(d: DeviceResponse) -> Self {
        Self {
            id: d.id,
            name: d.name,
            owner: d.owner.into(),
            topic: d.pubsub.endpoint,
        }
    }
}
