pub mod collaborator;
pub mod router;
