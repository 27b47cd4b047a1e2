// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: main.rs
// Author: hashcalc maintainers

use hashcalc::hcalc::app;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	app::run()?;
	Ok(())
}
