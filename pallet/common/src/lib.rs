//! shared pallet types and traits
#![cfg_attr(not(feature = "std"), no_std)]

pub use frame_support::log as logger;
use frame_support::dispatch::DispatchResult;
use sp_std::vec::Vec;

use seed_primitives::Balance;

#[cfg(feature = "std")]
pub mod test_utils;
#[cfg(feature = "std")]
pub use test_utils::test_prelude;

/// syntactic sugar for logging.
/// the caller must define a variable `LOG_TARGET = "<my-target>"`
#[macro_export]
macro_rules! log {
	($level:tt, $patter:expr $(, $values:expr)* $(,)?) => {
		seed_pallet_common::logger::$level!(
			target: crate::LOG_TARGET,
			$patter $(, $values)*
		)
	};
}

/// A bandwidth delegation registry, keyed by beneficiary.
///
/// The registry is owned by the surrounding platform; implementations record how much NET and
/// CPU weight is actually granted to an account. Callers treat it as eventually-consistent:
/// a delegate/undelegate request is an instruction, not a guarantee that the recorded weights
/// already moved.
pub trait StakeDelegator {
	/// The ID type for an account in the system
	type AccountId;

	/// The `(net_weight, cpu_weight)` currently delegated to `who`, zero if no record exists.
	fn delegation_of(who: &Self::AccountId) -> (Balance, Balance);

	/// Request an increase of the NET/CPU weight delegated to `who`.
	fn delegate(who: &Self::AccountId, net: Balance, cpu: Balance) -> DispatchResult;

	/// Request a decrease of the NET/CPU weight delegated to `who`.
	/// Implementations release the backing funds only after their own unbonding period.
	fn undelegate(who: &Self::AccountId, net: Balance, cpu: Balance) -> DispatchResult;

	/// Every `(beneficiary, net_weight, cpu_weight)` record the registry currently holds.
	fn delegations() -> Vec<(Self::AccountId, Balance, Balance)>;
}
