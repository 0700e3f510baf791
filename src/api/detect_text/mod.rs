// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text recognition endpoint module
//!
//! Provides POST /detect_text for reading text out of an image.

pub mod handler;
pub mod response;

pub use handler::detect_text_handler;
pub use response::DetectTextResponse;
