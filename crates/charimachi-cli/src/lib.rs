//! Charimachi CLI - terminal front end for the route planner.
//!
//! This crate provides:
//! - plan-route: search a destination and print the bicycle route summary

pub mod render;
