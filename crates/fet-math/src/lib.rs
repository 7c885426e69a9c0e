//! Mathematical primitives for the SCPN functional-expansion tally workflow.

pub mod legendre;
pub mod quadrature;
