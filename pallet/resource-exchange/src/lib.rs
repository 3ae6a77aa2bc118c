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

//! # Resource Exchange pallet
//!
//! A single-pool bandwidth exchange. Participants deposit the payment asset, queue purchases
//! of NET/CPU bandwidth against a bonding-curve price, and are billed for their holdings once
//! per settlement cycle. The cycle also reconciles the ledger against the platform's
//! bandwidth-delegation registry, redistributes collected fees to balance holders, and rolls
//! the two-stage unstaking queue that models the network's unbonding cooldown.
//!
//! There is no counterparty order book: the pool is the sole counterparty, and settlement of
//! queued purchases is deferred to the next cycle by design.
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use pallet::*;

use alloc::vec::Vec;
use frame_support::{
	pallet_prelude::*,
	traits::{
		fungibles::{Inspect, Mutate},
		tokens::Preservation,
	},
	transactional, PalletId,
};
use frame_system::{
	offchain::{SendTransactionTypes, SubmitTransaction},
	pallet_prelude::*,
};
use seed_pallet_common::{log, StakeDelegator};
use seed_primitives::{AssetId, Balance};
use sp_runtime::{
	traits::{AccountIdConversion, CheckedDiv, Saturating, ValidateUnsigned, Zero},
	transaction_validity::{
		InvalidTransaction, TransactionPriority, TransactionSource, TransactionValidity,
		ValidTransaction,
	},
	ArithmeticError, FixedPointNumber, FixedU128, PerThing, Permill, SaturatedConversion,
};

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;
#[cfg(test)]
mod mock;

pub mod types;
pub use types::*;

pub mod weights;
pub use weights::WeightInfo;

/// The logging target for this pallet
pub(crate) const LOG_TARGET: &str = "resource-exchange";

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(0);

#[frame_support::pallet]
pub mod pallet {
	use super::*;

	#[pallet::pallet]
	#[pallet::storage_version(STORAGE_VERSION)]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config + SendTransactionTypes<Call<Self>> {
		/// The system event type
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// This pallet's Id, used for deriving the exchange's sovereign vault account
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// The asset participants deposit and bandwidth is priced in
		#[pallet::constant]
		type PaymentAssetId: Get<AssetId>;

		/// Blocks between settlement cycles
		#[pallet::constant]
		type CyclePeriod: Get<BlockNumberFor<Self>>;

		/// Maximum age for unsigned cycle transactions in blocks
		#[pallet::constant]
		type TransactionMaxAge: Get<BlockNumberFor<Self>>;

		/// Flattening divisor of the bonding curve: unit price = total / (liquid * PriceTune).
		/// Larger values make bandwidth cheaper across the whole utilization range.
		#[pallet::constant]
		type PriceTune: Get<u128>;

		/// Purchase-simulation slice size for quoting, in bandwidth units. Smaller slices give a
		/// more precise integral of the curve at more compute.
		#[pallet::constant]
		type PurchaseStep: Get<Balance>;

		/// Hard bound on quote integration steps; the slice widens beyond this
		#[pallet::constant]
		type MaxPriceSteps: Get<u32>;

		/// Share of liquid funds that pending orders may collectively commit. The remainder is
		/// headroom so settlement-time pricing still has liquidity to integrate over.
		#[pallet::constant]
		type LiquidSafetyMargin: Get<Permill>;

		/// Share of collected cycle fees diverted to the dev fund instead of reward payouts
		#[pallet::constant]
		type DevFeeShare: Get<Permill>;

		/// Account (as a PalletId) credited with the dev fee share; `None` disables the split
		#[pallet::constant]
		type DevFundId: Get<Option<PalletId>>;

		/// Currency implementation for custody of the payment asset
		type MultiCurrency: Inspect<Self::AccountId, AssetId = AssetId>
			+ Mutate<Self::AccountId, Balance = Balance>;

		/// The platform's bandwidth-delegation registry
		type StakeDelegator: StakeDelegator<AccountId = Self::AccountId>;

		/// Interface to access weight values
		type WeightInfo: WeightInfo;
	}

	/// The pool singleton: liquid funds, staked funds and the two-stage unstake queue.
	#[pallet::storage]
	pub type State<T: Config> = StorageValue<_, ExchangeState<BlockNumberFor<T>>, ValueQuery>;

	/// Exchange ledger, one row per participant.
	#[pallet::storage]
	pub(super) type Accounts<T: Config> =
		StorageMap<_, Twox64Concat, T::AccountId, ExchangeAccount>;

	/// At most one netted pending purchase per participant.
	#[pallet::storage]
	pub(super) type PendingOrders<T: Config> =
		StorageMap<_, Twox64Concat, T::AccountId, PendingOrder>;

	/// The block the next settlement cycle is due at. Zero means "run at the first opportunity".
	#[pallet::storage]
	pub(super) type NextCycleAt<T: Config> = StorageValue<_, BlockNumberFor<T>, ValueQuery>;

	/// Withdrawals the vault could not pay immediately, released once the unstaking cooldown
	/// returns enough of the payment asset.
	#[pallet::storage]
	pub(super) type DeferredPayouts<T: Config> =
		StorageMap<_, Twox64Concat, T::AccountId, Balance, ValueQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// Funds entered the exchange and were credited to the depositor's balance.
		FundsDeposited { who: T::AccountId, amount: Balance },
		/// Balance was withdrawn and paid out immediately.
		FundsWithdrawn { who: T::AccountId, amount: Balance },
		/// Balance was withdrawn but the payout waits for the unstaking cooldown.
		WithdrawalDeferred { who: T::AccountId, amount: Balance },
		/// A bandwidth purchase was queued (or merged into an existing pending order).
		/// `cost` is the quote for the whole adjusted order at current pool state.
		StakeOrderQueued { who: T::AccountId, net: Balance, cpu: Balance, cost: Balance },
		/// Bandwidth was sold; `from_pending` cancelled queued purchases, `from_confirmed`
		/// entered the unstaking cooldown.
		StakeSold {
			who: T::AccountId,
			net: Balance,
			cpu: Balance,
			from_pending: Balance,
			from_confirmed: Balance,
		},
		/// A pending order was cancelled at settlement because the balance could not cover it.
		StakeOrderCancelled { who: T::AccountId, amount: Balance },
		/// An account paid its bandwidth bill for this cycle.
		AccountBilled { who: T::AccountId, fee: Balance },
		/// An account could not afford its confirmed holding; it was zeroed and the backing
		/// funds sent through the unstaking cooldown.
		AccountLiquidated { who: T::AccountId, net: Balance, cpu: Balance },
		/// Cycle fees were shared out to balance holders.
		RewardsDistributed { fees_collected: Balance, reward_pool: Balance },
		/// The registry was asked to grant additional bandwidth weight.
		BandwidthDelegated { who: T::AccountId, net: Balance, cpu: Balance },
		/// The registry was asked to revoke bandwidth weight.
		BandwidthUndelegated { who: T::AccountId, net: Balance, cpu: Balance },
		/// A delegation with no matching exchange account was revoked in full.
		UnknownDelegationSwept { who: T::AccountId, amount: Balance },
		/// A previously deferred withdrawal was paid out.
		DeferredPayoutReleased { who: T::AccountId, amount: Balance },
		/// A settlement pass completed.
		CycleSettled { fees_collected: Balance, next_cycle_at: BlockNumberFor<T> },
		/// The cycle was invoked ahead of schedule and did nothing.
		CycleDeferred { due_at: BlockNumberFor<T> },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Amount must be positive
		ZeroAmount,
		/// Order must buy or sell a positive amount of bandwidth
		EmptyOrder,
		/// No exchange account exists for the caller
		AccountNotFound,
		/// Account balance cannot cover the requested amount
		InsufficientBalance,
		/// The pool's uncommitted liquidity cannot cover the requested amount
		InsufficientLiquidity,
		/// Caller holds less bandwidth than it tried to sell
		InsufficientStake,
		/// The bonding curve is undefined for the current pool state
		PricingUnavailable,
		/// Netting split did not add up to the requested amount; this is a logic bug
		StakeMismatch,
		/// Offchain error not a validator
		OffchainErrNotValidator,
		/// Offchain error too early
		OffchainErrTooEarly,
		/// Offchain error on submitting transaction
		OffchainErrSubmitTransaction,
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Moves `amount` of the payment asset into the exchange's custody and credits the
		/// caller's exchange balance, creating the account if it does not exist yet.
		///
		/// Deposited balance earns a share of every cycle's collected fees and can back
		/// bandwidth purchases via `buy_stake`.
		///
		/// Emits `FundsDeposited` when successful.
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::deposit())]
		#[transactional]
		pub fn deposit(origin: OriginFor<T>, amount: Balance) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);

			T::MultiCurrency::transfer(
				T::PaymentAssetId::get(),
				&who,
				&Self::vault_account(),
				amount,
				Preservation::Expendable,
			)?;

			Accounts::<T>::try_mutate(&who, |maybe_account| -> DispatchResult {
				let account = maybe_account.get_or_insert_with(ExchangeAccount::default);
				account.balance =
					account.balance.checked_add(amount).ok_or(ArithmeticError::Overflow)?;
				Ok(())
			})?;
			State::<T>::mutate(|state| state.on_deposit(amount));

			Self::deposit_event(Event::FundsDeposited { who, amount });
			Ok(())
		}

		/// Debits `amount` from the caller's exchange balance.
		///
		/// The payout happens immediately when the vault holds enough of the payment asset;
		/// otherwise it is deferred and released by a later cycle, once the unstaking
		/// cooldown has returned funds to the vault. Funds committed to pending purchases
		/// cannot be withdrawn until the next settlement.
		///
		/// Restrictions:
		/// - `amount` must be positive and within both the caller's balance and the pool's
		///   liquid funds.
		///
		/// Emits `FundsWithdrawn` or `WithdrawalDeferred`.
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::withdraw())]
		#[transactional]
		pub fn withdraw(origin: OriginFor<T>, amount: Balance) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);

			let mut account = Accounts::<T>::get(&who).ok_or(Error::<T>::AccountNotFound)?;
			ensure!(account.balance >= amount, Error::<T>::InsufficientBalance);

			let mut state = State::<T>::get();
			ensure!(state.liquid_funds >= amount, Error::<T>::InsufficientLiquidity);

			account.balance = account.balance.saturating_sub(amount);
			state.on_withdraw(amount);

			let asset_id = T::PaymentAssetId::get();
			let vault = Self::vault_account();
			if T::MultiCurrency::balance(asset_id, &vault) >= amount {
				T::MultiCurrency::transfer(asset_id, &vault, &who, amount, Preservation::Expendable)?;
				Self::deposit_event(Event::FundsWithdrawn { who: who.clone(), amount });
			} else {
				// vault tokens are still delegated on-network; pay once the cooldown frees them
				DeferredPayouts::<T>::mutate(&who, |owed| *owed = owed.saturating_add(amount));
				Self::deposit_event(Event::WithdrawalDeferred { who: who.clone(), amount });
			}

			if account.is_empty() && !PendingOrders::<T>::contains_key(&who) {
				Accounts::<T>::remove(&who);
			} else {
				Accounts::<T>::insert(&who, account);
			}
			State::<T>::put(state);

			Ok(())
		}

		/// Queues a purchase of `net`/`cpu` bandwidth for the next settlement cycle, merging
		/// with any order already pending for the caller.
		///
		/// The pool optimistically moves the promised funds from liquid to staked right away;
		/// the caller's balance is only charged when the cycle settles the order. The whole
		/// adjusted order is re-quoted from scratch on every call so stacked purchases cannot
		/// dodge the curve.
		///
		/// Restrictions:
		/// - `net + cpu` must be positive (either side may be zero).
		/// - The adjusted order must fit within the safety-margined share of liquid funds.
		/// - The caller's balance must cover the quote for the adjusted order.
		///
		/// Emits `StakeOrderQueued` when successful.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::buy_stake())]
		pub fn buy_stake(origin: OriginFor<T>, net: Balance, cpu: Balance) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(!net.saturating_add(cpu).is_zero(), Error::<T>::EmptyOrder);

			let account = Accounts::<T>::get(&who).ok_or(Error::<T>::AccountNotFound)?;

			let mut order = PendingOrders::<T>::get(&who).unwrap_or_default();
			order.net = order.net.checked_add(net).ok_or(ArithmeticError::Overflow)?;
			order.cpu = order.cpu.checked_add(cpu).ok_or(ArithmeticError::Overflow)?;

			let mut state = State::<T>::get();
			let committable = T::LiquidSafetyMargin::get().mul_floor(state.liquid_funds);
			ensure!(order.total() <= committable, Error::<T>::InsufficientLiquidity);

			let cost = Self::stake_quote(&state, order.total())?;
			ensure!(account.balance >= cost, Error::<T>::InsufficientBalance);

			PendingOrders::<T>::insert(&who, order);
			state.on_buystake(net.saturating_add(cpu));
			State::<T>::put(state);

			Self::deposit_event(Event::StakeOrderQueued { who, net, cpu, cost });
			Ok(())
		}

		/// Sells `net`/`cpu` bandwidth back to the pool.
		///
		/// Pending purchases are cancelled before confirmed holdings are touched: the pending
		/// portion never left the pool, so its funds return to liquid immediately, while the
		/// confirmed portion is really delegated on-network and must ride the two-stage
		/// unstaking cooldown before becoming liquid again.
		///
		/// Restrictions:
		/// - `net + cpu` must be positive, each side within the caller's pending + confirmed
		///   holding of that resource kind.
		///
		/// Emits `StakeSold` when successful.
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::sell_stake())]
		pub fn sell_stake(origin: OriginFor<T>, net: Balance, cpu: Balance) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let amount = net.saturating_add(cpu);
			ensure!(!amount.is_zero(), Error::<T>::EmptyOrder);

			let mut account = Accounts::<T>::get(&who).ok_or(Error::<T>::AccountNotFound)?;
			let mut order = PendingOrders::<T>::get(&who).unwrap_or_default();

			let sellable_net = account.resource_net.saturating_add(order.net);
			let sellable_cpu = account.resource_cpu.saturating_add(order.cpu);
			ensure!(net <= sellable_net && cpu <= sellable_cpu, Error::<T>::InsufficientStake);

			// cancel queued purchases first, spill into confirmed holdings once exhausted
			let net_from_pending = net.min(order.net);
			let cpu_from_pending = cpu.min(order.cpu);
			let net_from_confirmed = net.saturating_sub(net_from_pending);
			let cpu_from_confirmed = cpu.saturating_sub(cpu_from_pending);

			order.net = order.net.saturating_sub(net_from_pending);
			order.cpu = order.cpu.saturating_sub(cpu_from_pending);
			account.resource_net = account.resource_net.saturating_sub(net_from_confirmed);
			account.resource_cpu = account.resource_cpu.saturating_sub(cpu_from_confirmed);

			let from_pending = net_from_pending.saturating_add(cpu_from_pending);
			let from_confirmed = net_from_confirmed.saturating_add(cpu_from_confirmed);
			// drift between the request and the split is a logic bug, not a user error
			ensure!(
				from_pending.saturating_add(from_confirmed) == amount,
				Error::<T>::StakeMismatch
			);

			if order.is_empty() {
				PendingOrders::<T>::remove(&who);
			} else {
				PendingOrders::<T>::insert(&who, order);
			}

			State::<T>::mutate(|state| state.on_sellstake(from_confirmed, from_pending));

			if account.is_empty() && !PendingOrders::<T>::contains_key(&who) {
				Accounts::<T>::remove(&who);
			} else {
				Accounts::<T>::insert(&who, account);
			}

			Self::deposit_event(Event::StakeSold { who, net, cpu, from_pending, from_confirmed });
			Ok(())
		}

		/// Runs one settlement pass, submitted as an unsigned transaction by this pallet's
		/// offchain worker when the cycle period has elapsed.
		///
		/// Invoked ahead of schedule it deliberately does nothing (the pass is deferred until
		/// the due block), so a stray early invocation cannot bill anyone twice. After a
		/// successful pass the next due block is computed from the block the pass was due at,
		/// not the block it ran at, so scheduling drift does not accumulate.
		///
		/// The pass, over every account: bill bandwidth holdings at one frozen price
		/// snapshot, reconcile ledger holdings against the delegation registry, redistribute
		/// collected fees to balance holders, sweep delegations that no longer map to an
		/// account, release deferred payouts the vault can now cover, reap emptied accounts,
		/// and roll the unstaking queue forward one stage.
		#[pallet::call_index(4)]
		#[pallet::weight(T::WeightInfo::cycle())]
		#[transactional]
		pub fn cycle(origin: OriginFor<T>, _current_block: BlockNumberFor<T>) -> DispatchResult {
			ensure_none(origin)?;

			let now = frame_system::Pallet::<T>::block_number();
			let due = NextCycleAt::<T>::get();
			if now < due {
				Self::deposit_event(Event::CycleDeferred { due_at: due });
				return Ok(());
			}

			let fees_collected = Self::do_cycle(now);

			// drift-corrected: arm from the block we were due at, not from "now"
			let period = T::CyclePeriod::get();
			let base = if due.is_zero() { now } else { due };
			let mut next = base.saturating_add(period);
			if next <= now {
				next = now.saturating_add(period);
			}
			NextCycleAt::<T>::put(next);

			Self::deposit_event(Event::CycleSettled { fees_collected, next_cycle_at: next });
			Ok(())
		}
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		fn offchain_worker(now: BlockNumberFor<T>) {
			match Self::do_offchain_worker(now) {
				Ok(_) => log!(
					debug,
					"🤖 offchain worker submitted cycle at block: {:?}; done.",
					now,
				),
				Err(e) => log!(
					debug,
					"offchain worker skipped at block [{:?}]: {:?}",
					now,
					e,
				),
			}
		}
	}

	const UNSIGNED_PRIORITY: TransactionPriority = TransactionPriority::max_value() / 2;

	#[pallet::validate_unsigned]
	impl<T: Config> ValidateUnsigned for Pallet<T> {
		type Call = Call<T>;

		fn validate_unsigned(source: TransactionSource, call: &Self::Call) -> TransactionValidity {
			match call {
				Call::cycle { current_block } => {
					Self::validate_transaction_source(&source)?;
					Self::validate_timing(current_block)?;

					ValidTransaction::with_tag_prefix("ResourceExchangeCycle")
						.priority(UNSIGNED_PRIORITY)
						.and_provides(*current_block)
						.longevity(64_u64)
						.propagate(false)
						.build()
				},
				_ => InvalidTransaction::Call.into(),
			}
		}
	}

	impl<T: Config> Pallet<T> {
		/// The exchange's sovereign account holding custody of all deposited funds
		pub fn vault_account() -> T::AccountId {
			T::PalletId::get().into_account_truncating()
		}

		/// Marginal price of one bandwidth unit at the current pool state:
		/// `total / (liquid_funds * PriceTune)`, evaluated before any purchase.
		///
		/// Fails fast when the pool is empty or fully committed; a clamped price would
		/// silently misprice everything billed with it.
		pub fn unit_price(
			state: &ExchangeState<BlockNumberFor<T>>,
		) -> Result<FixedU128, DispatchError> {
			let total = state.total();
			let liquid = state.liquid_funds;
			ensure!(!total.is_zero() && !liquid.is_zero(), Error::<T>::PricingUnavailable);

			let tuned = liquid.checked_mul(T::PriceTune::get()).ok_or(ArithmeticError::Overflow)?;
			FixedU128::checked_from_rational(total, tuned)
				.ok_or_else(|| Error::<T>::PricingUnavailable.into())
		}

		/// Quotes the cost of buying `quantity` bandwidth units at the current pool state.
		///
		/// The curve has no cheap closed-form integral, so the purchase is simulated in
		/// `PurchaseStep`-sized slices: each slice pays the marginal price, then leaves the
		/// simulated liquid pool, making the next slice dearer. The averaged slice price
		/// times the quantity is the quote. A purchase smaller than one slice pays the
		/// plain marginal price; a purchase larger than `MaxPriceSteps` slices widens the
		/// slice instead of iterating further.
		pub fn stake_quote(
			state: &ExchangeState<BlockNumberFor<T>>,
			quantity: Balance,
		) -> Result<Balance, DispatchError> {
			if quantity.is_zero() {
				return Ok(Zero::zero());
			}
			let total = state.total();
			let mut liquid = state.liquid_funds;
			ensure!(!total.is_zero() && !liquid.is_zero(), Error::<T>::PricingUnavailable);

			let mut step = T::PurchaseStep::get().max(1).min(quantity);
			let mut steps = quantity / step;
			let max_steps: Balance = T::MaxPriceSteps::get().into();
			if steps > max_steps {
				steps = max_steps;
				step = quantity / steps;
			}

			let tune = T::PriceTune::get();
			let mut summed = FixedU128::zero();
			for _ in 0..steps.saturated_into::<u32>() {
				ensure!(!liquid.is_zero(), Error::<T>::PricingUnavailable);
				let tuned = liquid.checked_mul(tune).ok_or(ArithmeticError::Overflow)?;
				let slice_price = FixedU128::checked_from_rational(total, tuned)
					.ok_or(Error::<T>::PricingUnavailable)?;
				summed = summed.saturating_add(slice_price);
				liquid = liquid.saturating_sub(step);
			}

			let cost_per_unit = summed
				.checked_div(&FixedU128::saturating_from_integer(steps))
				.ok_or(ArithmeticError::DivisionByZero)?;
			Ok(cost_per_unit.saturating_mul_int(quantity))
		}

		/// One full settlement pass. Returns the fees collected by billing.
		fn do_cycle(now: BlockNumberFor<T>) -> Balance {
			let mut state = State::<T>::get();
			let account_ids: Vec<T::AccountId> = Accounts::<T>::iter_keys().collect();

			// one price snapshot for the whole pass so billing is uniform across accounts
			let mut fees_collected: Balance = Zero::zero();
			match Self::unit_price(&state) {
				Ok(price) => {
					for who in &account_ids {
						fees_collected = fees_collected
							.saturating_add(Self::bill_account(who, price, &mut state));
					}
				},
				Err(_) => {
					log!(debug, "nothing to bill at block {:?}, pool is empty", now);
				},
			}

			for who in &account_ids {
				Self::match_bandwidth(who);
			}

			// rewards come last: the share is proportional to balances billing just changed
			if !fees_collected.is_zero() {
				Self::distribute_rewards(&account_ids, fees_collected, &state);
			}

			Self::unstake_unknown(&mut state);
			Self::release_deferred_payouts();

			for who in &account_ids {
				if let Some(account) = Accounts::<T>::get(who) {
					if account.is_empty() && !PendingOrders::<T>::contains_key(who) {
						Accounts::<T>::remove(who);
					}
				}
			}

			state.on_cycle();
			state.settled_at = now;
			State::<T>::put(state);

			fees_collected
		}

		/// Bills one account for its confirmed + pending bandwidth at `price` per unit,
		/// degrading in three tiers rather than ever failing the batch:
		/// full bill -> cancel the pending order and bill confirmed only -> force-liquidate
		/// the confirmed holding through the unstaking cooldown.
		///
		/// The pending order row is consumed in every tier. Returns the fee collected.
		fn bill_account(
			who: &T::AccountId,
			price: FixedU128,
			state: &mut ExchangeState<BlockNumberFor<T>>,
		) -> Balance {
			let mut account = match Accounts::<T>::get(who) {
				Some(account) => account,
				None => return Zero::zero(),
			};
			let order = PendingOrders::<T>::take(who).unwrap_or_default();

			let owed_with_order =
				price.saturating_mul_int(account.total_resources().saturating_add(order.total()));
			if account.balance >= owed_with_order {
				account.balance = account.balance.saturating_sub(owed_with_order);
				account.resource_net = account.resource_net.saturating_add(order.net);
				account.resource_cpu = account.resource_cpu.saturating_add(order.cpu);
				Accounts::<T>::insert(who, account);
				if !owed_with_order.is_zero() {
					Self::deposit_event(Event::AccountBilled {
						who: who.clone(),
						fee: owed_with_order,
					});
				}
				return owed_with_order;
			}

			// cannot afford the order: cancel it and bill the confirmed holding alone.
			// The order's funds were never delegated, so they go straight back to liquid.
			if !order.is_empty() {
				state.on_order_cancelled(order.total());
				Self::deposit_event(Event::StakeOrderCancelled {
					who: who.clone(),
					amount: order.total(),
				});
			}

			let owed = price.saturating_mul_int(account.total_resources());
			if account.balance >= owed {
				account.balance = account.balance.saturating_sub(owed);
				Accounts::<T>::insert(who, account);
				if !owed.is_zero() {
					Self::deposit_event(Event::AccountBilled { who: who.clone(), fee: owed });
				}
				return owed;
			}

			// cannot even afford the confirmed holding: liquidate it through the cooldown
			let holding = account.total_resources();
			if !holding.is_zero() {
				state.on_unstake_delayed(holding);
				Self::deposit_event(Event::AccountLiquidated {
					who: who.clone(),
					net: account.resource_net,
					cpu: account.resource_cpu,
				});
				account.resource_net = Zero::zero();
				account.resource_cpu = Zero::zero();
			}
			Accounts::<T>::insert(who, account);
			Zero::zero()
		}

		/// Reconciles one account's ledger holdings against the delegation registry: the
		/// positive excess of ledger over registry is delegated, the reverse is undelegated,
		/// per resource kind. Registry failures are logged and retried next cycle; the
		/// ledger stays the source of intent.
		fn match_bandwidth(who: &T::AccountId) {
			let account = match Accounts::<T>::get(who) {
				Some(account) => account,
				None => return,
			};
			let (net_delegated, cpu_delegated) = T::StakeDelegator::delegation_of(who);

			let net_up = account.resource_net.saturating_sub(net_delegated);
			let cpu_up = account.resource_cpu.saturating_sub(cpu_delegated);
			let net_down = net_delegated.saturating_sub(account.resource_net);
			let cpu_down = cpu_delegated.saturating_sub(account.resource_cpu);

			if !net_up.saturating_add(cpu_up).is_zero() {
				match T::StakeDelegator::delegate(who, net_up, cpu_up) {
					Ok(_) => Self::deposit_event(Event::BandwidthDelegated {
						who: who.clone(),
						net: net_up,
						cpu: cpu_up,
					}),
					Err(e) => {
						log!(error, "⛔️ delegate request for {:?} failed: {:?}", who, e)
					},
				}
			}
			if !net_down.saturating_add(cpu_down).is_zero() {
				match T::StakeDelegator::undelegate(who, net_down, cpu_down) {
					Ok(_) => Self::deposit_event(Event::BandwidthUndelegated {
						who: who.clone(),
						net: net_down,
						cpu: cpu_down,
					}),
					Err(e) => {
						log!(error, "⛔️ undelegate request for {:?} failed: {:?}", who, e)
					},
				}
			}
		}

		/// Shares this cycle's fees among balance holders, `balance * fees / pool total`
		/// each, after diverting the configured dev cut. Balance itself is the reward
		/// basis: deposits fund the pool's liquidity whether or not their owner buys
		/// bandwidth, and this is what pays them for it.
		fn distribute_rewards(
			account_ids: &[T::AccountId],
			fees_collected: Balance,
			state: &ExchangeState<BlockNumberFor<T>>,
		) {
			let dev_cut = match T::DevFundId::get() {
				Some(_) => T::DevFeeShare::get().mul_floor(fees_collected),
				None => Zero::zero(),
			};
			let reward_pool = fees_collected.saturating_sub(dev_cut);

			let total = state.total();
			if total.is_zero() {
				return;
			}
			let reward_rate = match FixedU128::checked_from_rational(reward_pool, total) {
				Some(rate) => rate,
				None => return,
			};

			for who in account_ids {
				Accounts::<T>::mutate(who, |maybe_account| {
					if let Some(account) = maybe_account {
						let reward = reward_rate.saturating_mul_int(account.balance);
						account.balance = account.balance.saturating_add(reward);
					}
				});
			}

			if !dev_cut.is_zero() {
				if let Some(dev_fund) = T::DevFundId::get() {
					let dev_account: T::AccountId = dev_fund.into_account_truncating();
					Accounts::<T>::mutate(&dev_account, |maybe_account| {
						let account = maybe_account.get_or_insert_with(ExchangeAccount::default);
						account.balance = account.balance.saturating_add(dev_cut);
					});
				}
			}

			Self::deposit_event(Event::RewardsDistributed { fees_collected, reward_pool });
		}

		/// Revokes every registry record whose beneficiary has no exchange account, pushing
		/// the abandoned stake into the unstaking cooldown.
		fn unstake_unknown(state: &mut ExchangeState<BlockNumberFor<T>>) {
			let vault = Self::vault_account();
			for (who, net_weight, cpu_weight) in T::StakeDelegator::delegations() {
				if who == vault || Accounts::<T>::contains_key(&who) {
					continue;
				}
				let amount = net_weight.saturating_add(cpu_weight);
				if amount.is_zero() {
					continue;
				}
				match T::StakeDelegator::undelegate(&who, net_weight, cpu_weight) {
					Ok(_) => {
						state.on_unstake_delayed(amount);
						Self::deposit_event(Event::UnknownDelegationSwept {
							who: who.clone(),
							amount,
						});
					},
					Err(e) => {
						log!(error, "⛔️ sweeping unknown delegation of {:?} failed: {:?}", who, e)
					},
				}
			}
		}

		/// Pays out deferred withdrawals the vault can now cover.
		fn release_deferred_payouts() {
			let asset_id = T::PaymentAssetId::get();
			let vault = Self::vault_account();
			let payouts: Vec<(T::AccountId, Balance)> = DeferredPayouts::<T>::iter().collect();
			for (who, amount) in payouts {
				if T::MultiCurrency::balance(asset_id, &vault) < amount {
					continue;
				}
				match T::MultiCurrency::transfer(asset_id, &vault, &who, amount, Preservation::Expendable)
				{
					Ok(_) => {
						DeferredPayouts::<T>::remove(&who);
						Self::deposit_event(Event::DeferredPayoutReleased { who, amount });
					},
					Err(e) => log!(error, "💸 deferred payout to {:?} failed: {:?}", who, e),
				}
			}
		}

		fn do_offchain_worker(now: BlockNumberFor<T>) -> DispatchResult {
			if !sp_io::offchain::is_validator() {
				return Err(Error::<T>::OffchainErrNotValidator)?;
			}
			if NextCycleAt::<T>::get() > now {
				return Err(Error::<T>::OffchainErrTooEarly)?;
			}

			let call = Call::cycle { current_block: now };
			SubmitTransaction::<T, Call<T>>::submit_unsigned_transaction(call.into()).map_err(
				|e| {
					log!(error, "⛔️ error submitting cycle transaction: {:?}", e);
					Error::<T>::OffchainErrSubmitTransaction
				},
			)?;
			Ok(())
		}

		/// Only the node's own offchain worker may arm a cycle; gossiped copies are refused.
		fn validate_transaction_source(
			source: &TransactionSource,
		) -> Result<(), InvalidTransaction> {
			match source {
				TransactionSource::Local | TransactionSource::InBlock => Ok(()),
				_ => Err(InvalidTransaction::Call),
			}
		}

		fn validate_timing(current_block: &BlockNumberFor<T>) -> Result<(), InvalidTransaction> {
			let block_number = frame_system::Pallet::<T>::block_number();

			if &block_number < current_block {
				return Err(InvalidTransaction::Future);
			}

			if block_number.saturating_sub(*current_block) > T::TransactionMaxAge::get() {
				return Err(InvalidTransaction::Stale);
			}

			if NextCycleAt::<T>::get() > block_number {
				return Err(InvalidTransaction::Future);
			}

			Ok(())
		}
	}
}
