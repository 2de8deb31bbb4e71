use gateway_core::GatewayService;

/// Shared handler state. Everything inside is immutable; cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: GatewayService,
}

impl AppState {
    pub fn new(service: GatewayService) -> Self {
        Self { service }
    }
}
