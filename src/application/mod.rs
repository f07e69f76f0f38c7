//! Application layer - command and query handlers.
//!
//! Handlers coordinate domain logic with the ports. They hold no state of
//! their own beyond Arc'd port references and are safe to construct per
//! request.

pub mod handlers;
