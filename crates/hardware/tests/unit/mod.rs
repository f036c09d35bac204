//! # Unit Components
//!
//! This module mirrors the crate layout: shared types, the clocked blocks
//! under `core`, and the configuration and statistics surfaces.
