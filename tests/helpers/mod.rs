// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the axum request helper and the scripted model gateway stub
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

pub mod axum_test;
pub mod stub_gateway;
