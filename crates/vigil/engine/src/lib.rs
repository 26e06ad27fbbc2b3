#![deny(unsafe_code)]
//! Workflow engine for the Vigil case-management core
//!
//! The engine runs multi-step approval chains over case entities: a chain
//! is started with an ordered list of required approvers, each approver
//! decides in turn, and full approval applies the entity's outcome
//! transition through the lifecycle registry. Rejection at any pending
//! step closes the chain immediately.
//!
//! The engine owns no storage and no delivery: persistence goes through
//! the [`vigil_store::WorkflowStore`] port and side effects leave as
//! [`vigil_types::EngineEvent`]s on an injected [`vigil_bus::EventBus`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vigil_bus::EventBus;
//! use vigil_engine::WorkflowEngine;
//! use vigil_store::MemoryStore;
//! use vigil_types::{ActorId, EntitySnapshot, SubjectId, WorkflowType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let bus = Arc::new(EventBus::new());
//!     let engine = WorkflowEngine::new(store.clone(), bus);
//!
//!     let visit = EntitySnapshot::new(WorkflowType::Visit, SubjectId::new("citizen-17"));
//!     let visit_id = visit.id.clone();
//!     store.insert_entity(visit);
//!
//!     let instance = engine
//!         .start(
//!             WorkflowType::Visit,
//!             visit_id,
//!             vec![ActorId::new("supervisor"), ActorId::new("commissioner")],
//!             ActorId::new("field-officer"),
//!         )
//!         .await?;
//!     println!("chain {} awaits {:?}", instance.id.short(), instance.current_approver());
//!     Ok(())
//! }
//! ```

pub mod engine;

pub use engine::WorkflowEngine;
