// Copyright 2022-2023 Futureverse Corporation Limited
//
// Licensed under the LGPL, Version 3.0 (the "License");
// you may not use this file except in compliance with the License.
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// You may obtain a copy of the License at the root of this project source code

//! Common types across runtimes, pallets, and/or client
#![cfg_attr(not(feature = "std"), no_std)]

pub use types::*;

#[cfg(feature = "std")]
pub mod test_utils;

pub mod types {
	use sp_runtime::traits::BlakeTwo256;

	/// An index to a block.
	pub type BlockNumber = u32;

	/// Some way of identifying an account on the chain.
	pub type AccountId = sp_runtime::AccountId32;

	/// The chain address type
	pub type Address = AccountId;

	/// Balance of an account.
	pub type Balance = u128;

	/// Index of a transaction in the chain.
	pub type Index = u32;

	/// A hash of some data used by the chain.
	pub type Hash = sp_core::H256;

	// Id used for identifying assets.
	pub type AssetId = u32;

	pub type Timestamp = u64;

	/// Blake2-256 Hash implementation.
	pub type BlakeTwo256Hash = BlakeTwo256;
}
