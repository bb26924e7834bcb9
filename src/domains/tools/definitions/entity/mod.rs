//! Entity schema tools: metadata, attributes and relationships.

pub mod attribute;
pub mod attributes;
pub mod metadata;
pub mod relationships;

pub use attribute::{EntityAttributeParams, GetEntityAttributeTool};
pub use attributes::{EntityAttributesParams, GetEntityAttributesTool};
pub use metadata::{EntityMetadataParams, GetEntityMetadataTool};
pub use relationships::{EntityRelationshipsParams, GetEntityRelationshipsTool};
