//! Colloquy - Conversational Form Filling
//!
//! This crate drives a chat-style dialogue that fills out a multi-field form:
//! an answering agent asks one question per form field, the engine tracks
//! which field each finalized agent turn pertains to, detects the completion
//! sentinel, and commits the collected dialogue to the persistence boundary.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
