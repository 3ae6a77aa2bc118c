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

#![cfg(test)]

use super::*;
use crate as pallet_resource_exchange;
use seed_pallet_common::{
	impl_frame_system_config, impl_pallet_assets_config, impl_pallet_balance_config,
};
use sp_runtime::testing::TestXt;
use std::collections::BTreeMap;

pub(crate) use seed_pallet_common::test_prelude::*;

construct_runtime!(
	pub enum Test
	{
		System: frame_system,
		Balances: pallet_balances,
		Assets: pallet_assets,
		ResourceExchange: pallet_resource_exchange,
	}
);

impl_frame_system_config!(Test);
impl_pallet_balance_config!(Test);
impl_pallet_assets_config!(Test);

parameter_types! {
	pub const ResourceExchangePalletId: PalletId = PalletId(*b"resxchng");
	pub const PaymentAssetId: AssetId = SPENDING_ASSET_ID;
	pub const CyclePeriod: u64 = 100;
	pub const TransactionMaxAge: u64 = 5;
	pub const PriceTune: u128 = 1;
	pub const PurchaseStep: Balance = 10_000;
	pub const MaxPriceSteps: u32 = 1_000;
	pub const LiquidSafetyMargin: Permill = Permill::from_percent(90);
	pub const DevFundId: Option<PalletId> = Some(PalletId(*b"exdevfnd"));
	pub static DevFeeShare: Permill = Permill::from_percent(0);
}

impl Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type PalletId = ResourceExchangePalletId;
	type PaymentAssetId = PaymentAssetId;
	type CyclePeriod = CyclePeriod;
	type TransactionMaxAge = TransactionMaxAge;
	type PriceTune = PriceTune;
	type PurchaseStep = PurchaseStep;
	type MaxPriceSteps = MaxPriceSteps;
	type LiquidSafetyMargin = LiquidSafetyMargin;
	type DevFeeShare = DevFeeShare;
	type DevFundId = DevFundId;
	type MultiCurrency = Assets;
	type StakeDelegator = MockDelegator;
	type WeightInfo = ();
}

impl<C> frame_system::offchain::SendTransactionTypes<C> for Test
where
	RuntimeCall: From<C>,
{
	type OverarchingCall = RuntimeCall;
	type Extrinsic = TestXt<RuntimeCall, ()>;
}

/// An in-memory delegation registry living inside the test externalities, so every `TestExt`
/// starts with a clean table.
pub struct MockDelegator;

const MOCK_DELEGATIONS_KEY: &[u8] = b":mock_bandwidth_delegations";

impl MockDelegator {
	fn all() -> BTreeMap<AccountId, (Balance, Balance)> {
		frame_support::storage::unhashed::get_or_default(MOCK_DELEGATIONS_KEY)
	}

	fn write(table: BTreeMap<AccountId, (Balance, Balance)>) {
		frame_support::storage::unhashed::put(MOCK_DELEGATIONS_KEY, &table);
	}

	/// Force a registry record directly, e.g. a stale delegation with no account behind it
	pub fn set_delegation(who: &AccountId, net: Balance, cpu: Balance) {
		let mut table = Self::all();
		if net == 0 && cpu == 0 {
			table.remove(who);
		} else {
			table.insert(who.clone(), (net, cpu));
		}
		Self::write(table);
	}
}

impl StakeDelegator for MockDelegator {
	type AccountId = AccountId;

	fn delegation_of(who: &AccountId) -> (Balance, Balance) {
		Self::all().get(who).copied().unwrap_or_default()
	}

	fn delegate(who: &AccountId, net: Balance, cpu: Balance) -> DispatchResult {
		let mut table = Self::all();
		let entry = table.entry(who.clone()).or_default();
		entry.0 = entry.0.saturating_add(net);
		entry.1 = entry.1.saturating_add(cpu);
		Self::write(table);
		Ok(())
	}

	fn undelegate(who: &AccountId, net: Balance, cpu: Balance) -> DispatchResult {
		let mut table = Self::all();
		if let Some(entry) = table.get_mut(who) {
			entry.0 = entry.0.saturating_sub(net);
			entry.1 = entry.1.saturating_sub(cpu);
			if entry.0 == 0 && entry.1 == 0 {
				table.remove(who);
			}
		}
		Self::write(table);
		Ok(())
	}

	fn delegations() -> Vec<(AccountId, Balance, Balance)> {
		Self::all().into_iter().map(|(who, (net, cpu))| (who, net, cpu)).collect()
	}
}
