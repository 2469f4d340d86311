// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod access;
pub mod participation;

pub use access::{require_manager, require_membership, require_project_member};
pub use participation::{
    Breakdown, ParticipationResponse, ParticipationService, QuestionnaireSubmission,
    SubmissionReceipt,
};
