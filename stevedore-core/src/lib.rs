//! Stevedore Core
//!
//! Domain types and decision logic for the Stevedore deployment tool.
//!
//! This crate contains:
//! - Task definition types: templates fetched from ECS and the payloads
//!   registered back as new revisions
//! - Environment override loading (JSON or line-oriented env files)
//! - The container definition merge applied when rendering a new revision
//! - Naming derivations for services, task families, and scheduled rules
//! - Scheduled-target reconciliation planning
//!
//! Everything here is synchronous and side-effect free apart from reading
//! the optional env-override file, so the branching logic can be tested
//! without any API client.

pub mod env_file;
pub mod error;
pub mod merge;
pub mod naming;
pub mod reconcile;
pub mod service;
pub mod task_definition;
