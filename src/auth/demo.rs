//! Presentation-only role override.
//!
//! The override never touches the authenticated user record, the token
//! store or the backend. It only decides which role the UI displays.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    model::{
        role::{Permissions, Role},
        user::SessionUser,
    },
    utils::storage::{KeyValueStore, StorageKey},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemoState {
    pub is_demo_mode: bool,
    /// Ignored while `is_demo_mode` is false.
    pub demo_role: Role,
}

/// Real role next to the role the UI should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub actual_role: Role,
    pub displayed_role: Role,
    pub label: String,
    pub is_demo: bool,
    pub permissions: Permissions,
}

pub struct DemoOverride {
    state: RwLock<DemoState>,
    storage: Arc<dyn KeyValueStore>,
}

impl DemoOverride {
    /// Picks up a demo flag left in storage by an earlier run.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let state = DemoState {
            is_demo_mode: storage.get(StorageKey::DemoMode).is_some(),
            demo_role: Role::default(),
        };

        Self {
            state: RwLock::new(state),
            storage,
        }
    }

    pub fn state(&self) -> DemoState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enable(&self) {
        self.storage.set(StorageKey::DemoMode, "true");
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .is_demo_mode = true;
        info!("Demo mode enabled");
    }

    pub fn disable(&self) {
        self.storage.delete(StorageKey::DemoMode);
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .is_demo_mode = false;
        info!("Demo mode disabled");
    }

    pub fn set_role(&self, role: Role) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .demo_role = role;
        info!(role = %role, "Demo role selected");
    }

    /// Role the UI should display for `user`.
    pub fn displayed_role(&self, user: &SessionUser) -> Role {
        let state = self.state();
        if state.is_demo_mode {
            state.demo_role
        } else {
            user.role
        }
    }

    pub fn role_view(&self, user: &SessionUser) -> RoleView {
        let displayed_role = self.displayed_role(user);
        RoleView {
            actual_role: user.role,
            displayed_role,
            label: displayed_role.label().to_string(),
            is_demo: self.state().is_demo_mode,
            permissions: Permissions::for_role(displayed_role),
        }
    }
}
