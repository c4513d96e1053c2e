// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific database plumbing.
//!
//! `SQLite` is the only supported backend: it covers single-node production
//! deployments, development, and in-memory testing without external
//! infrastructure. All domain queries and mutations remain backend-agnostic
//! Diesel DSL and live in the `queries` and `mutations` modules.

pub mod sqlite;
