// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read paths.
//!
//! All queries are backend-agnostic Diesel DSL. Timestamp range filters
//! compare stored RFC 3339 text, which orders identically to the instants
//! it encodes.

pub mod charges;
pub mod history;
pub mod properties;
pub mod reservations;
pub mod settings;
