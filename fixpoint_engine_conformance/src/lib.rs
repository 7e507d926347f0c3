// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conformance test crate for `fixpoint_engine`; the suite lives in
//! `tests/conformance.rs`.
