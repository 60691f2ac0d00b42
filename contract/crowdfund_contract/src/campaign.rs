use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::storage_types::{CrowdfundError, DataKey};

/// Pull a contribution from the contributor into the contract's pool.
pub fn process_contribution(env: &Env, contributor: &Address, amount: i128) {
    let token_address = read_token(env);
    let token_client = token::Client::new(env, &token_address);
    token_client.transfer(contributor, &env.current_contract_address(), &amount);
}

/// Pay out a finalized request from the contract's pool to the recipient.
pub fn process_payout(env: &Env, recipient: &Address, amount: i128) {
    let token_address = read_token(env);
    let token_client = token::Client::new(env, &token_address);
    token_client.transfer(&env.current_contract_address(), recipient, &amount);
}

pub fn read_token(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .unwrap_or_else(|| panic_with_error!(env, CrowdfundError::NotInitialized))
}

/// Strict majority of distinct approvers: with 4 approvers, 2 votes are not
/// enough and 3 are.
pub fn has_quorum(approval_count: u32, approvers_count: u32) -> bool {
    (approval_count as u64) * 2 > approvers_count as u64
}

pub fn validate_amount(env: &Env, amount: i128) {
    if amount <= 0 {
        panic_with_error!(env, CrowdfundError::InvalidAmount);
    }
}

pub fn checked_credit(env: &Env, balance: i128, amount: i128) -> i128 {
    balance
        .checked_add(amount)
        .unwrap_or_else(|| panic_with_error!(env, CrowdfundError::ArithmeticOverflow))
}

pub fn checked_debit(env: &Env, balance: i128, amount: i128) -> i128 {
    balance
        .checked_sub(amount)
        .unwrap_or_else(|| panic_with_error!(env, CrowdfundError::ArithmeticOverflow))
}
