//! core
//!
//! Core domain types, persistence, and lookup for the merchant registry.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Handle, MerchantId, UtcTimestamp
//! - [`merchant`] - The merchant record and store document schema
//! - [`store`] - JSON-backed record store
//! - [`lookup`] - Substring and weighted fuzzy filters
//! - [`fuzzy`] - Bitap approximate matcher used by the fuzzy filter
//! - [`select`] - Resolving exactly one merchant from a query
//! - [`import`] - Bulk import from CSV and JSON files
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for on-disk storage
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid handles from reaching the store
//! - The filesystem is the source of truth; a corrupt registry reads as empty
//! - Every path is injected, so all of this runs against temp directories in tests

pub mod config;
pub mod fuzzy;
pub mod import;
pub mod lookup;
pub mod merchant;
pub mod paths;
pub mod select;
pub mod store;
pub mod types;
