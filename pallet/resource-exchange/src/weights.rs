// Copyright 2022-2023 Futureverse Corporation Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// You may obtain a copy of the License at the root of this project source code

//! Autogenerated weights for pallet_resource_exchange
//!
//! THIS FILE WAS AUTO-GENERATED USING THE SUBSTRATE BENCHMARK CLI VERSION 4.0.0-dev
//! DATE: 2023-09-28, STEPS: `50`, REPEAT: `20`, LOW RANGE: `[]`, HIGH RANGE: `[]`
//! WORST CASE MAP SIZE: `1000000`
//! EXECUTION: ``, WASM-EXECUTION: `Compiled`, CHAIN: `Some("dev")`, DB CACHE: 1024

// Executed Command:
// ./target/release/seed
// benchmark
// pallet
// --chain=dev
// --steps=50
// --repeat=20
// --pallet=pallet-resource-exchange
// --extrinsic=*
// --wasm-execution=compiled
// --heap-pages=4096
// --output
// ./pallet/resource-exchange/src/weights.rs

#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_resource_exchange.
pub trait WeightInfo {
	fn deposit() -> Weight;
	fn withdraw() -> Weight;
	fn buy_stake() -> Weight;
	fn sell_stake() -> Weight;
	fn cycle() -> Weight;
}

/// Weights for pallet_resource_exchange using the Substrate node and recommended hardware.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
	// Storage: `Assets::Asset` (r:1 w:1)
	// Storage: `Assets::Account` (r:2 w:2)
	// Storage: `ResourceExchange::Accounts` (r:1 w:1)
	// Storage: `ResourceExchange::State` (r:1 w:1)
	fn deposit() -> Weight {
		Weight::from_parts(57_000_000, 11394)
			.saturating_add(T::DbWeight::get().reads(5))
			.saturating_add(T::DbWeight::get().writes(5))
	}
	// Storage: `ResourceExchange::Accounts` (r:1 w:1)
	// Storage: `ResourceExchange::State` (r:1 w:1)
	// Storage: `ResourceExchange::PendingOrders` (r:1 w:0)
	// Storage: `ResourceExchange::DeferredPayouts` (r:1 w:1)
	// Storage: `Assets::Asset` (r:1 w:1)
	// Storage: `Assets::Account` (r:2 w:2)
	fn withdraw() -> Weight {
		Weight::from_parts(61_000_000, 11394)
			.saturating_add(T::DbWeight::get().reads(7))
			.saturating_add(T::DbWeight::get().writes(6))
	}
	// Storage: `ResourceExchange::Accounts` (r:1 w:0)
	// Storage: `ResourceExchange::PendingOrders` (r:1 w:1)
	// Storage: `ResourceExchange::State` (r:1 w:1)
	fn buy_stake() -> Weight {
		Weight::from_parts(43_000_000, 6196)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(2))
	}
	// Storage: `ResourceExchange::Accounts` (r:1 w:1)
	// Storage: `ResourceExchange::PendingOrders` (r:1 w:1)
	// Storage: `ResourceExchange::State` (r:1 w:1)
	fn sell_stake() -> Weight {
		Weight::from_parts(44_000_000, 6196)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(3))
	}
	// Storage: `ResourceExchange::State` (r:1 w:1)
	// Storage: `ResourceExchange::NextCycleAt` (r:1 w:1)
	// Storage: `ResourceExchange::Accounts` (r:11 w:10)
	// Storage: `ResourceExchange::PendingOrders` (r:10 w:10)
	// Storage: `ResourceExchange::DeferredPayouts` (r:1 w:1)
	// Storage: `Assets::Account` (r:2 w:2)
	fn cycle() -> Weight {
		Weight::from_parts(312_000_000, 32754)
			.saturating_add(T::DbWeight::get().reads(26))
			.saturating_add(T::DbWeight::get().writes(25))
	}
}

// For backwards compatibility and tests
impl WeightInfo for () {
	fn deposit() -> Weight {
		Weight::from_parts(57_000_000, 11394)
			.saturating_add(RocksDbWeight::get().reads(5))
			.saturating_add(RocksDbWeight::get().writes(5))
	}
	fn withdraw() -> Weight {
		Weight::from_parts(61_000_000, 11394)
			.saturating_add(RocksDbWeight::get().reads(7))
			.saturating_add(RocksDbWeight::get().writes(6))
	}
	fn buy_stake() -> Weight {
		Weight::from_parts(43_000_000, 6196)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(2))
	}
	fn sell_stake() -> Weight {
		Weight::from_parts(44_000_000, 6196)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(3))
	}
	fn cycle() -> Weight {
		Weight::from_parts(312_000_000, 32754)
			.saturating_add(RocksDbWeight::get().reads(26))
			.saturating_add(RocksDbWeight::get().writes(25))
	}
}
