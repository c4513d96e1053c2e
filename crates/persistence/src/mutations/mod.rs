// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write paths.
//!
//! The transition mutation is the only compound write: the conditional status
//! update and the history insert commit in one transaction or not at all.
//! Everything else is a single-statement insert or update.

pub mod charges;
pub mod properties;
pub mod reservations;
pub mod settings;
