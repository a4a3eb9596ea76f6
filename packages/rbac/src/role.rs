// ABOUTME: Role and capability definitions for portfolio access control
// ABOUTME: A flat, static capability table with no hierarchy or per-resource overrides

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RbacError;

/// Roles a user can hold. Each user has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Drives project scope and submits baselines for validation
    ProjectLead,
    /// Portfolio management office: validates, approves, and restores baselines
    Pmo,
    /// Read-only participant
    TeamMember,
    /// Full access, including destructive operations
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::ProjectLead, Role::Pmo, Role::TeamMember, Role::Admin];

    /// Capabilities granted to this role. The table is static;
    /// same input always yields the same grants.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::ProjectLead => &[Capability::EditScope],
            Role::Pmo => &[
                Capability::ValidateBaseline,
                Capability::ApproveChange,
                Capability::RestoreBaseline,
            ],
            Role::TeamMember => &[],
            Role::Admin => &Capability::ALL,
        }
    }

    /// Whether this role grants the capability
    pub fn allows(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Checks the capability table ahead of a guarded mutation
    pub fn require(&self, capability: Capability) -> Result<(), RbacError> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(RbacError::Forbidden {
                role: *self,
                capability,
            })
        }
    }

    /// The full capability table row for this role, for clients
    /// that gate their controls on it
    pub fn grants(&self) -> Vec<CapabilityGrant> {
        Capability::ALL
            .iter()
            .map(|&capability| CapabilityGrant {
                capability,
                allowed: self.allows(capability),
            })
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::ProjectLead => write!(f, "Project Lead"),
            Role::Pmo => write!(f, "PMO"),
            Role::TeamMember => write!(f, "Team Member"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

/// Actions that can be gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Modify project scope, create and submit baselines
    EditScope,
    /// Act on submitted baselines (approve or reject)
    ValidateBaseline,
    /// Approve a proposed change to an approved baseline
    ApproveChange,
    /// Re-lock a superseded approved baseline
    RestoreBaseline,
    /// Remove a project and everything under it
    DeleteProject,
    /// Bypass workflow guards
    ForceOverride,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::EditScope,
        Capability::ValidateBaseline,
        Capability::ApproveChange,
        Capability::RestoreBaseline,
        Capability::DeleteProject,
        Capability::ForceOverride,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::EditScope => "edit-scope",
            Capability::ValidateBaseline => "validate-baseline",
            Capability::ApproveChange => "approve-change",
            Capability::RestoreBaseline => "restore-baseline",
            Capability::DeleteProject => "delete-project",
            Capability::ForceOverride => "force-override",
        };
        write!(f, "{}", name)
    }
}

/// One entry of the capability table as served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityGrant {
    pub capability: Capability,
    pub allowed: bool,
}
