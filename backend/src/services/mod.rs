//! Business logic services for Stockbook

pub mod drugs;
pub mod ledger;
pub mod materials;
pub mod pricing;
pub mod stock;

pub use drugs::DrugService;
pub use ledger::LedgerService;
pub use materials::MaterialService;
pub use pricing::PricingService;
pub use stock::StockService;
