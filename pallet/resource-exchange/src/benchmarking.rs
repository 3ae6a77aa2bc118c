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

use super::*;
use crate::Pallet as ResourceExchange;
use frame_benchmarking::{account as bench_account, benchmarks, impl_benchmark_test_suite};
use frame_support::assert_ok;
use frame_system::RawOrigin;

fn funded_account<T: Config>(seed: u32) -> T::AccountId {
	let user: T::AccountId = bench_account("user", seed, 0);
	assert_ok!(T::MultiCurrency::mint_into(T::PaymentAssetId::get(), &user, 10_000_000));
	user
}

benchmarks! {
	deposit {
		let user = funded_account::<T>(0);
	}: _(RawOrigin::Signed(user.clone()), 1_000_000)
	verify {
		assert_eq!(Accounts::<T>::get(&user).unwrap().balance, 1_000_000);
	}

	withdraw {
		let user = funded_account::<T>(0);
		assert_ok!(ResourceExchange::<T>::deposit(RawOrigin::Signed(user.clone()).into(), 1_000_000));
	}: _(RawOrigin::Signed(user.clone()), 500_000)
	verify {
		assert_eq!(Accounts::<T>::get(&user).unwrap().balance, 500_000);
	}

	buy_stake {
		let user = funded_account::<T>(0);
		assert_ok!(ResourceExchange::<T>::deposit(RawOrigin::Signed(user.clone()).into(), 1_000_000));
	}: _(RawOrigin::Signed(user.clone()), 1_000, 1_000)
	verify {
		assert!(PendingOrders::<T>::get(&user).is_some());
	}

	sell_stake {
		let user = funded_account::<T>(0);
		assert_ok!(ResourceExchange::<T>::deposit(RawOrigin::Signed(user.clone()).into(), 1_000_000));
		assert_ok!(ResourceExchange::<T>::buy_stake(RawOrigin::Signed(user.clone()).into(), 1_000, 1_000));
	}: _(RawOrigin::Signed(user.clone()), 500, 500)
	verify {
		assert_eq!(PendingOrders::<T>::get(&user).unwrap().net, 500);
	}

	cycle {
		// a populated pass: billing with a pending order, reconciliation and rewards
		let user = funded_account::<T>(0);
		assert_ok!(ResourceExchange::<T>::deposit(RawOrigin::Signed(user.clone()).into(), 1_000_000));
		assert_ok!(ResourceExchange::<T>::buy_stake(RawOrigin::Signed(user.clone()).into(), 10_000, 10_000));
		let now = frame_system::Pallet::<T>::block_number();
	}: _(RawOrigin::None, now)
	verify {
		assert!(PendingOrders::<T>::get(&user).is_none());
	}
}

#[cfg(test)]
fn bench_ext() -> sp_io::TestExternalities {
	use seed_pallet_common::test_prelude::*;
	TestExt::<crate::mock::Test>::default().with_asset(SPENDING_ASSET_ID, "XRP", &[]).build()
}

impl_benchmark_test_suite!(ResourceExchange, crate::benchmarking::bench_ext(), crate::mock::Test);
