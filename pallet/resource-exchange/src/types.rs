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

use codec::{Decode, Encode, MaxEncodedLen};
use frame_support::RuntimeDebug;
use scale_info::TypeInfo;
use seed_primitives::Balance;
use sp_runtime::traits::{Saturating, Zero};

/// A participant's exchange ledger row: free balance plus confirmed bandwidth holdings.
#[derive(Clone, Encode, Decode, PartialEq, Eq, Default, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct ExchangeAccount {
	/// Deposited funds not currently owed for bandwidth; the reward basis.
	pub balance: Balance,
	/// Confirmed NET bandwidth holding, billed every cycle.
	pub resource_net: Balance,
	/// Confirmed CPU bandwidth holding, billed every cycle.
	pub resource_cpu: Balance,
}

impl ExchangeAccount {
	pub fn total_resources(&self) -> Balance {
		self.resource_net.saturating_add(self.resource_cpu)
	}

	/// An account with nothing in it can be reaped.
	pub fn is_empty(&self) -> bool {
		self.balance.is_zero() && self.resource_net.is_zero() && self.resource_cpu.is_zero()
	}
}

/// A netted, not-yet-billed bandwidth purchase awaiting the next settlement cycle.
/// At most one exists per account; successive buys accumulate into it.
#[derive(Clone, Encode, Decode, PartialEq, Eq, Default, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct PendingOrder {
	pub net: Balance,
	pub cpu: Balance,
}

impl PendingOrder {
	pub fn total(&self) -> Balance {
		self.net.saturating_add(self.cpu)
	}

	pub fn is_empty(&self) -> bool {
		self.net.is_zero() && self.cpu.is_zero()
	}
}

/// The pool singleton. Every unit of currency the exchange holds against bandwidth sits in
/// exactly one of the four buckets; all mutations go through the named transitions below so
/// the conservation of `total()` stays auditable.
#[derive(Clone, Encode, Decode, PartialEq, Eq, Default, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct ExchangeState<BlockNumber> {
	/// Funds available to back new bandwidth purchases.
	pub liquid_funds: Balance,
	/// Funds backing confirmed holdings and optimistically-promised pending orders.
	pub total_staked: Balance,
	/// Unstaked this cycle; becomes `refunding` at the next settlement.
	pub to_be_refunding: Balance,
	/// Unstaked last cycle; becomes liquid at the next settlement.
	pub refunding: Balance,
	/// The block the last settlement pass actually ran at.
	pub settled_at: BlockNumber,
}

impl<BlockNumber> ExchangeState<BlockNumber> {
	/// The pricing denominator and conservation quantity.
	pub fn total(&self) -> Balance {
		self.liquid_funds
			.saturating_add(self.total_staked)
			.saturating_add(self.to_be_refunding)
			.saturating_add(self.refunding)
	}

	/// Everything not actively staked, including funds still in cooldown.
	pub fn unstaked(&self) -> Balance {
		self.liquid_funds.saturating_add(self.to_be_refunding).saturating_add(self.refunding)
	}

	/// deposit: external funds enter the liquid bucket.
	pub fn on_deposit(&mut self, amount: Balance) {
		self.liquid_funds = self.liquid_funds.saturating_add(amount);
	}

	/// withdraw: external funds leave the liquid bucket. Caller checks sufficiency.
	pub fn on_withdraw(&mut self, amount: Balance) {
		self.liquid_funds = self.liquid_funds.saturating_sub(amount);
	}

	/// buystake: an optimistic promise, liquid -> staked. Not yet charged to any balance.
	pub fn on_buystake(&mut self, stake: Balance) {
		self.liquid_funds = self.liquid_funds.saturating_sub(stake);
		self.total_staked = self.total_staked.saturating_add(stake);
	}

	/// A pending order is reversed: staked -> liquid, immediately available again because the
	/// promised funds were never actually delegated.
	pub fn on_order_cancelled(&mut self, stake: Balance) {
		self.total_staked = self.total_staked.saturating_sub(stake);
		self.liquid_funds = self.liquid_funds.saturating_add(stake);
	}

	/// Confirmed stake is released: staked -> to_be_refunding. Really-delegated funds must
	/// ride the two-stage cooldown before they are liquid again.
	pub fn on_unstake_delayed(&mut self, amount: Balance) {
		self.total_staked = self.total_staked.saturating_sub(amount);
		self.to_be_refunding = self.to_be_refunding.saturating_add(amount);
	}

	/// sellstake: the pending portion reverses instantly, the confirmed portion is delayed.
	pub fn on_sellstake(&mut self, from_confirmed: Balance, from_pending: Balance) {
		self.on_order_cancelled(from_pending);
		self.on_unstake_delayed(from_confirmed);
	}

	/// Settlement rolls the unstake queue forward one stage:
	/// `refunding` becomes liquid, `to_be_refunding` becomes `refunding`. Strictly one stage
	/// per cycle, mirroring the network's unbonding cooldown.
	pub fn on_cycle(&mut self) {
		self.liquid_funds = self.liquid_funds.saturating_add(self.refunding);
		self.refunding = self.to_be_refunding;
		self.to_be_refunding = Zero::zero();
	}
}
