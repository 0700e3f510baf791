// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection endpoint module
//!
//! Provides POST /detect_objects for naming the objects in an image.

pub mod handler;
pub mod response;

pub use handler::detect_objects_handler;
pub use response::DetectObjectsResponse;
