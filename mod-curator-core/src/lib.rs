#![doc = "mod-curator-core: incremental curated-list generation against a rate-limited mod catalog."]

//! This crate holds every algorithm and data model of the curator: loading the
//! tracked list and the previous curated list, planning which mods to refetch,
//! batch fetching against the catalog, and writing the new curated list.
//! Transport lives behind [`contract::CatalogApi`]; the CLI crate supplies the HTTP client.
//!
//! # Usage
//! Build a [`config::SyncConfig`], pick a catalog implementation and call
//! [`synchronise::synchronise`].

pub mod change_signal;
pub mod config;
pub mod contract;
pub mod fetch;
pub mod index;
pub mod input;
pub mod merge;
pub mod model;
pub mod output;
pub mod planner;
pub mod report;
pub mod snapshot;
pub mod synchronise;
