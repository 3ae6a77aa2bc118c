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

use crate::*;
use sp_runtime::BuildStorage;
use sp_std::vec::Vec;

struct AssetsFixture<T: frame_system::Config + pallet_assets::Config> {
	pub id: <T as pallet_assets::Config>::AssetIdParameter,
	pub symbol: Vec<u8>,
	pub endowments: Vec<(T::AccountId, <T as pallet_assets::Config>::Balance)>,
}

impl<T: frame_system::Config + pallet_assets::Config> AssetsFixture<T> {
	fn new(
		id: <T as pallet_assets::Config>::AssetIdParameter,
		symbol: &[u8],
		endowments: &[(T::AccountId, <T as pallet_assets::Config>::Balance)],
	) -> Self {
		Self { id, symbol: symbol.to_vec(), endowments: endowments.to_vec() }
	}
}

/// Generic TestExternalities builder to be used across all pallets
pub struct TestExt<T: frame_system::Config + pallet_balances::Config + pallet_assets::Config> {
	balances: Vec<(T::AccountId, <T as pallet_balances::Config>::Balance)>,
	assets: Vec<AssetsFixture<T>>,
	block_number: BlockNumber,
}

impl<T> Default for TestExt<T>
where
	T: frame_system::Config + pallet_balances::Config + pallet_assets::Config,
	<T as pallet_balances::Config>::Balance: From<Balance>,
{
	/// Create new TestExt with default values
	fn default() -> Self {
		Self { balances: vec![], assets: vec![], block_number: 1 }
	}
}

impl<T> TestExt<T>
where
	T: frame_system::Config + pallet_balances::Config + pallet_assets::Config,
	<T as pallet_balances::Config>::Balance: From<Balance>,
	<T as pallet_assets::Config>::Balance: From<Balance>,
	T::AccountId: From<[u8; 32]>,
	<T as pallet_assets::Config>::AssetIdParameter: From<AssetId>,
	<T as pallet_assets::Config>::AssetId: From<u32>,
	<T as frame_system::Config>::Hash: From<[u8; 32]>,
{
	/// Configure some native token balances
	pub fn with_balances(
		mut self,
		balances: &[(T::AccountId, <T as pallet_balances::Config>::Balance)],
	) -> Self {
		self.balances = balances.to_vec();
		self
	}

	/// Configure an asset with id, name and some endowments
	/// total supply = sum(endowments)
	pub fn with_asset(
		mut self,
		id: <T as pallet_assets::Config>::AssetIdParameter,
		name: &str,
		endowments: &[(T::AccountId, <T as pallet_assets::Config>::Balance)],
	) -> Self {
		self.assets.push(AssetsFixture::new(id, name.as_bytes(), endowments));
		self
	}

	/// Configure starting block number
	pub fn with_block_number(mut self, block_number: BlockNumber) -> Self {
		self.block_number = block_number;
		self
	}

	/// Build the TestExternalities for general use across all pallets
	pub fn build(self) -> sp_io::TestExternalities {
		let mut ext = frame_system::GenesisConfig::<T>::default().build_storage().unwrap();
		let mut assets = Vec::default();
		let mut metadata = Vec::default();
		let mut accounts = Vec::default();
		let default_owner = T::AccountId::from([100u8; 32]);

		if !self.assets.is_empty() {
			for AssetsFixture { id, symbol, endowments } in self.assets {
				assets.push((id.into(), default_owner.clone(), true, 1.into()));
				metadata.push((id.into(), symbol.clone(), symbol, 6));
				for (payee, balance) in endowments {
					accounts.push((id.into(), payee, balance));
				}
			}
		}

		// Configure pallet_assets Genesis Config with assets
		if !assets.is_empty() {
			pallet_assets::GenesisConfig::<T> { assets, metadata, accounts }
				.assimilate_storage(&mut ext)
				.unwrap();
		}

		// add initial balances to Genesis Config
		if !self.balances.is_empty() {
			pallet_balances::GenesisConfig::<T> { balances: self.balances }
				.assimilate_storage(&mut ext)
				.unwrap();
		}

		let mut ext: sp_io::TestExternalities = ext.into();
		ext.execute_with(|| {
			frame_system::Pallet::<T>::initialize(
				&self.block_number.into(),
				&[0u8; 32].into(),
				&Default::default(),
			)
		});

		ext
	}
}
