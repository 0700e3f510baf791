// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Audio endpoints
//!
//! GET /get_audio serves the latest published clip, GET /get_audio/:id a
//! specific one from the recent-clip cache.

pub mod handler;

pub use handler::{
    attach_audio_id, get_audio_by_id_handler, get_audio_handler, speak, AUDIO_ID_HEADER,
};
