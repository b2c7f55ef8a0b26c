// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable demos for the Overstory engines; see the `examples/` targets.
