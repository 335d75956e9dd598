// Copyright 2026 HealerKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! dungeonkit-tools library — maintenance tooling for the HealerKit project.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(clippy::new_without_default)]

pub mod cli;
pub mod pbxproj;
pub mod renderer;
pub mod scrape;
