// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Shapecut: replay a knife gesture on a shape and print the result

fn main() -> anyhow::Result<()> {
    shapecut::run()
}
