/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports,
/// handling all interaction with external systems.
pub mod outbound;
