//! Stripe payment gateway adapters.

mod api_types;
mod charge_gateway;
mod mock_gateway;

pub use charge_gateway::{StripeChargeGateway, StripeGatewayConfig};
pub use mock_gateway::MockPaymentGateway;
