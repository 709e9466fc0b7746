//! Metro route server.
//!
//! A web application that answers: "how do I get from this station to
//! that one, and which way is quickest at this time of day?"

pub mod config;
pub mod domain;
pub mod network;
pub mod planner;
pub mod rules;
pub mod web;
