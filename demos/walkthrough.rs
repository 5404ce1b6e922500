// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Replays a short allocation session on a 128 KB arena and prints the chain as a table.

use fitsim::Config;
use fitsim::Manager;
use fitsim::Strategy;

fn main() {
    let mut manager = Manager::new(Config::default());

    let steps = [
        (20, Strategy::FirstFit),
        (10, Strategy::FirstFit),
        (20, Strategy::NextFit),
        (10, Strategy::NextFit),
        (10, Strategy::BestFit),
        (10, Strategy::BestFit),
    ];
    for (size, strategy) in steps {
        match manager.allocate(size, strategy) {
            Ok(allocation) => println!("{allocation}"),
            Err(err) => println!("error: {err}"),
        }
    }
    println!("{}", manager.snapshot());

    match manager.free(10) {
        Ok(release) => println!("{release}"),
        Err(err) => println!("error: {err}"),
    }
    println!("{}", manager.snapshot());

    match manager.allocate_auto(15) {
        Ok(allocation) => println!("{allocation}"),
        Err(err) => println!("error: {err}"),
    }
    println!("{}", manager.snapshot());
}
