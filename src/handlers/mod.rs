// handlers/mod.rs - Two handler tiers
//
// Public (no auth): service info, health, token issuance
// Protected (auth gate from `middleware::auth`): /api/items CRUD
pub mod protected;
pub mod public;
