//! shopify-partner - A registry of Shopify merchants for theme developers
//!
//! `sp` keeps a small local list of merchant stores (name, handle, URL) and
//! launches Shopify CLI theme commands against one of them, chosen through
//! fuzzy search.
//!
//! # Architecture
//!
//! The codebase is layered:
//!
//! - [`cli`] - Command-line interface layer (parses args, runs handlers)
//! - [`core`] - Domain types, the JSON record store, lookup, selection, import
//! - [`validator`] - Checks that a store handle belongs to a live storefront
//! - [`process`] - Runs the Shopify CLI and opens files in an editor
//! - [`ui`] - User interaction utilities
//!
//! # Invariants
//!
//! 1. Handles are unique across the registry after every successful write
//! 2. A missing or corrupt registry reads as empty and is never fatal
//! 3. The registry is rewritten whole, through a temp file and rename
//! 4. A failed store probe never modifies the registry

pub mod cli;
pub mod core;
pub mod process;
pub mod ui;
pub mod validator;
