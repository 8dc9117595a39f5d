// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to other Sluice crates.

#[cfg(feature = "page_adapter")]
pub mod page;
