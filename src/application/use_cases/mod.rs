/// Use cases module containing application business logic orchestration
mod identity_resolver;
mod reconcile_bom;
mod reconcile_registry;
mod resolve_origin;

#[cfg(test)]
mod mock_registry;

pub use identity_resolver::RegistryIdentityResolver;
pub use reconcile_bom::ReconcileBomUseCase;
pub use reconcile_registry::ReconcileRegistryUseCase;
pub use resolve_origin::{InternalClassification, OriginStats, ResolveOriginUseCase};
