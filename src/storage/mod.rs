// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Storage for synthesized audio

pub mod audio_store;

pub use audio_store::{AudioClip, AudioStore, AudioStoreStats, StoreError, AUDIO_FILE_NAME};
