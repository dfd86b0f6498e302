//! `shiftdesk-scheduler`: the assignment rules and the planners built on
//! them.
//!
//! # Overview
//!
//! | Module        | Responsibility                                         |
//! |---------------|--------------------------------------------------------|
//! | `validator`   | duplicate and same-date overlap checks                 |
//! | `assignments` | create / move / delete assignments through the checks  |
//! | `balance`     | fill unassigned shifts, least-loaded employee first    |
//! | `window`      | planning window and previous-week shift cloning        |
//! | `proposal`    | AI proposal with heuristic and copy-forward fallbacks  |
//! | `advisor`     | free-text AI advice over the current roster            |
//!
//! Everything here is written against the store traits and runs inside the
//! caller's transaction; AI calls happen outside it.

pub mod advisor;
pub mod ai_response;
pub mod assignments;
pub mod balance;
pub mod client;
pub mod error;
pub mod fallback;
pub mod prompt;
pub mod proposal;
pub mod types;
pub mod validator;
pub mod window;

#[cfg(test)]
mod testutil;

pub use advisor::Advisor;
pub use balance::auto_balance;
pub use client::{AiClient, AiSettings};
pub use error::{AssignmentError, Result, SchedulerError};
pub use proposal::{prepare_snapshot, PlanningSnapshot, ProposalGenerator};
pub use types::{
    AdvisorReply, AssignmentPatch, AssignmentRequest, BalanceMode, BalanceReport,
    ProposalSource, ProposedAssignment, ScheduleProposal, ScheduleRequest, ScheduleWindow,
};
pub use validator::validate_assignment;
