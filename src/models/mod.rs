// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod emission;
pub mod organization;
pub mod project;
pub mod stats;
pub mod transport;

pub use activity::{Activity, ActivityEntry, ActivitySource, ActivityView, ProjectActivityForm};
pub use emission::EmissionFactors;
pub use organization::{Invitation, InvitationStatus, Member, MemberRole, Organization};
pub use project::{Project, ProjectForm, ProjectSummary};
pub use stats::{ModeStats, ProjectStats, TravelLeg};
pub use transport::{TransportMode, TravelDirection};
