// src/core/mod.rs

pub mod alias_resolver;
pub mod graph;
pub mod paths;
pub mod plan_display;
pub mod props;
