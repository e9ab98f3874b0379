//! The operator on whose behalf a service call runs.

use crate::entities::operators::Role;
use crate::errors::domain::{DomainError, ForbiddenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins and organizers.
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Organizer)
    }

    /// Passes for the operator themself or for staff.
    pub fn ensure_self_or_staff(&self, operator_id: i64) -> Result<(), DomainError> {
        if self.id == operator_id || self.is_staff() {
            return Ok(());
        }
        Err(DomainError::forbidden(
            ForbiddenKind::NotOwner,
            format!("Operator {} may not act for operator {operator_id}", self.id),
        ))
    }
}
