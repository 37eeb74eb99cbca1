//! `billops-core`: shared building blocks for the billing console core.
//!
//! Pure domain primitives only: identifiers, money, the error model, the
//! aggregate/entity/value-object traits, the entity-kind vocabulary and the
//! console configuration.

pub mod aggregate;
pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod kind;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, DomainEvent, execute};
pub use config::ConsoleConfig;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ContractId, InvoiceId, PayableId, PaymentId, SupplierId};
pub use kind::EntityKind;
pub use money::Money;
pub use value_object::ValueObject;
