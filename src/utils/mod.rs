// ABOUTME: Shared plumbing used across the client modules
// ABOUTME: Currently HTTP client construction with tuned timeouts
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

/// HTTP client configuration and helpers
pub mod http_client;
