/// Ports module defining interfaces for hexagonal architecture
///
/// Only outbound (driven) ports exist here: the application core calls
/// infrastructure through them, and the driver wires concrete adapters in.
pub mod outbound;
