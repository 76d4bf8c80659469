// handlers/protected/mod.rs - Handlers behind the auth gate
//
// Route prefix: /api/*
// Every handler here can assume `AuthUser` is present in request extensions.
pub mod items;
