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

/// Prelude to be used in mocks and tests, for ease of use
pub mod test_prelude {
	pub use crate::{
		test_utils::{account_creation::*, test_constants::*, test_types::*, *},
		*,
	};
	pub use frame_support::{
		assert_err, assert_noop, assert_ok, assert_storage_noop, construct_runtime,
		dispatch::{DispatchError, DispatchResult},
		parameter_types,
		storage::{StorageMap, StorageValue},
		traits::BuildGenesisConfig,
		weights::{constants::RocksDbWeight as DbWeight, Weight},
		PalletId,
	};
	pub use frame_system::{EnsureRoot, RawOrigin};
	pub use seed_primitives::{test_utils::TestExt, AccountId, AssetId, Balance};
	pub use sp_core::{H160, H256, U256};
	pub use sp_runtime::{
		testing::Header,
		traits::{BlakeTwo256, IdentityLookup},
		ArithmeticError, BoundedVec, BuildStorage,
		DispatchError::BadOrigin,
		Permill, TokenError,
	};
	pub use sp_std::{vec, vec::Vec};
}

pub mod test_types {
	pub type BlockNumber = u64;

	pub type UncheckedExtrinsic<Test> = frame_system::mocking::MockUncheckedExtrinsic<Test>;

	pub type Block<Test> = frame_system::mocking::MockBlock<Test>;
}

pub mod test_constants {
	use seed_primitives::AssetId;

	pub const ROOT_ASSET_ID: AssetId = 1;
	pub const XRP_ASSET_ID: AssetId = 2;
	pub const SPENDING_ASSET_ID: AssetId = XRP_ASSET_ID;
}

/// Helper functions for creating accounts to be used in tests
pub mod account_creation {
	use seed_primitives::AccountId;

	/// Create an AccountId from a u64 seed
	pub fn create_account(seed: u64) -> AccountId {
		let mut raw = [0u8; 32];
		raw[24..].copy_from_slice(&seed.to_be_bytes());
		AccountId::new(raw)
	}

	/// Common account Alice
	pub fn alice() -> AccountId {
		create_account(1000)
	}

	/// Common account Bob
	pub fn bob() -> AccountId {
		create_account(2000)
	}

	/// Common account Charlie
	pub fn charlie() -> AccountId {
		create_account(3000)
	}

	/// Common account Dave
	pub fn dave() -> AccountId {
		create_account(4000)
	}
}

#[macro_export]
macro_rules! impl_frame_system_config {
	($test:ident) => {
		parameter_types! {
			pub const BlockHashCount: u64 = 250;
		}

		type BlockNumber = u64;

		impl frame_system::Config for $test {
			type Block = frame_system::mocking::MockBlock<$test>;
			type BlockWeights = ();
			type BlockLength = ();
			type BaseCallFilter = frame_support::traits::Everything;
			type RuntimeOrigin = RuntimeOrigin;
			type Nonce = u32;
			type RuntimeCall = RuntimeCall;
			type Hash = H256;
			type Hashing = BlakeTwo256;
			type AccountId = AccountId;
			type Lookup = IdentityLookup<Self::AccountId>;
			type BlockHashCount = BlockHashCount;
			type RuntimeEvent = RuntimeEvent;
			type DbWeight = ();
			type Version = ();
			type PalletInfo = PalletInfo;
			type AccountData = pallet_balances::AccountData<Balance>;
			type OnNewAccount = ();
			type OnKilledAccount = ();
			type SystemWeightInfo = ();
			type SS58Prefix = ();
			type OnSetCode = ();
			type MaxConsumers = frame_support::traits::ConstU32<16>;
		}
	};
}

#[macro_export]
macro_rules! impl_pallet_balance_config {
	($test:ident) => {
		parameter_types! {
			pub const MaxReserves: u32 = 50;
			pub const ExistentialDeposit: u128 = 1;
		}

		impl pallet_balances::Config for $test {
			type Balance = Balance;
			type RuntimeEvent = RuntimeEvent;
			type RuntimeHoldReason = ();
			type FreezeIdentifier = ();
			type DustRemoval = ();
			type ExistentialDeposit = ExistentialDeposit;
			type AccountStore = System;
			type MaxLocks = ();
			type WeightInfo = ();
			type MaxReserves = MaxReserves;
			type ReserveIdentifier = [u8; 8];
			type MaxHolds = sp_core::ConstU32<0>;
			type MaxFreezes = sp_core::ConstU32<0>;
		}
	};
}

#[macro_export]
macro_rules! impl_pallet_assets_config {
	($test:ident) => {
		parameter_types! {
			pub const AssetDeposit: Balance = 1_000_000;
			pub const AssetAccountDeposit: Balance = 16;
			pub const ApprovalDeposit: Balance = 1;
			pub const AssetsStringLimit: u32 = 50;
			pub const MetadataDepositBase: Balance = 1 * 68;
			pub const MetadataDepositPerByte: Balance = 1;
			pub const RemoveItemsLimit: u32 = 100;
		}

		impl pallet_assets::Config for $test {
			type RuntimeEvent = RuntimeEvent;
			type Balance = Balance;
			type AssetId = AssetId;
			type Currency = Balances;
			type ForceOrigin = EnsureRoot<AccountId>;
			type AssetDeposit = AssetDeposit;
			type MetadataDepositBase = MetadataDepositBase;
			type MetadataDepositPerByte = MetadataDepositPerByte;
			type ApprovalDeposit = ApprovalDeposit;
			type StringLimit = AssetsStringLimit;
			type Freezer = ();
			type Extra = ();
			type WeightInfo = ();
			type AssetAccountDeposit = AssetAccountDeposit;
			type RemoveItemsLimit = RemoveItemsLimit;
			type AssetIdParameter = AssetId;
			type CreateOrigin = frame_system::EnsureNever<AccountId>;
			type CallbackHandle = ();
			pallet_assets::runtime_benchmarks_enabled! {
				type BenchmarkHelper = ();
			}
		}
	};
}
