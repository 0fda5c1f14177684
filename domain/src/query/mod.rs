//! Query results - what each endpoint answered for one submission.
//!
//! - [`outcome::Outcome`] - success payload or structured failure
//! - [`result_set::ResultSet`] - one outcome per endpoint
//! - [`result_set::OutcomeEvent`] - a single outcome as it settles

pub mod outcome;
pub mod result_set;
