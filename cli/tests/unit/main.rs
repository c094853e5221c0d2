//! Unit tests for composer-provision
//!
//! These tests use fake ports and temp directories and run without network
//! access or a PHP interpreter.

mod helpers;
mod registry_service;
