#![no_std]


mod campaign;
mod events;
mod storage_types;

use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Env, String, Vec};
use storage_types::{
    Campaign, CampaignId, CrowdfundError, DataKey, PersistentKey, Request, RequestId,
    TTL_INSTANCE, TTL_PERSISTENT,
};

#[contract]
pub struct CrowdfundContract;

#[contractimpl]
impl CrowdfundContract {
    /// Initialize the contract with the token that denominates all
    /// contributions and payouts.
    pub fn initialize(env: Env, token: Address) {
        if env.storage().instance().has(&DataKey::Token) {
            panic_with_error!(&env, CrowdfundError::AlreadyInitialized);
        }

        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::NextCampaignId, &1u64);
        env.storage()
            .instance()
            .set(&DataKey::Campaigns, &Vec::<CampaignId>::new(&env));

        extend_instance(&env);
    }

    /// Create a new campaign managed by `creator` and register it.
    ///
    /// Returns the campaign id, the stable reference callers use for every
    /// other operation.
    pub fn create_campaign(env: Env, creator: Address, minimum_contribution: i128) -> CampaignId {
        creator.require_auth();
        campaign::validate_amount(&env, minimum_contribution);

        let campaign_id: CampaignId = env
            .storage()
            .instance()
            .get(&DataKey::NextCampaignId)
            .unwrap_or_else(|| panic_with_error!(&env, CrowdfundError::NotInitialized));

        let record = Campaign {
            id: campaign_id,
            manager: creator.clone(),
            minimum_contribution,
            balance: 0,
            approvers_count: 0,
            requests_count: 0,
            created_at: env.ledger().timestamp(),
        };
        write_campaign(&env, &record);

        // Registry is append-only, in creation order.
        let mut campaigns: Vec<CampaignId> = env
            .storage()
            .instance()
            .get(&DataKey::Campaigns)
            .unwrap_or(Vec::new(&env));
        campaigns.push_back(campaign_id);
        env.storage().instance().set(&DataKey::Campaigns, &campaigns);
        env.storage()
            .instance()
            .set(&DataKey::NextCampaignId, &(campaign_id + 1));

        extend_instance(&env);

        events::emit_campaign_created(
            &env,
            events::CampaignCreatedEvent {
                campaign_id,
                manager: creator,
                minimum_contribution,
            },
        );

        campaign_id
    }

    /// Contribute `amount` to a campaign. The first contribution at or above
    /// the campaign minimum makes the contributor an approver; later
    /// contributions only grow the balance.
    pub fn contribute(env: Env, campaign_id: CampaignId, contributor: Address, amount: i128) {
        contributor.require_auth();

        let mut record = get_campaign(&env, campaign_id);
        if amount < record.minimum_contribution {
            panic_with_error!(&env, CrowdfundError::ContributionTooSmall);
        }

        campaign::process_contribution(&env, &contributor, amount);
        record.balance = campaign::checked_credit(&env, record.balance, amount);

        let approver_key = PersistentKey::Approver(campaign_id, contributor.clone());
        let new_approver = !env.storage().persistent().has(&approver_key);
        if new_approver {
            env.storage().persistent().set(&approver_key, &true);
            extend_persistent(&env, &approver_key);
            record.approvers_count += 1;
        }

        write_campaign(&env, &record);

        events::emit_contribution_received(
            &env,
            events::ContributionReceivedEvent {
                campaign_id,
                contributor,
                amount,
                new_approver,
            },
        );
    }

    /// Create a spending request against a campaign's pooled balance.
    /// Manager only. The balance check is deferred to finalization, so a
    /// request may be created before the funds it asks for have been raised.
    pub fn create_request(
        env: Env,
        campaign_id: CampaignId,
        caller: Address,
        description: String,
        value: i128,
        recipient: Address,
    ) -> RequestId {
        caller.require_auth();

        let mut record = get_campaign(&env, campaign_id);
        if caller != record.manager {
            panic_with_error!(&env, CrowdfundError::NotAuthorized);
        }
        campaign::validate_amount(&env, value);

        let request_id = record.requests_count;
        let request = Request {
            id: request_id,
            description,
            value,
            recipient: recipient.clone(),
            complete: false,
            approval_count: 0,
            created_at: env.ledger().timestamp(),
        };
        write_request(&env, campaign_id, &request);

        record.requests_count += 1;
        write_campaign(&env, &record);

        events::emit_request_created(
            &env,
            events::RequestCreatedEvent {
                campaign_id,
                request_id,
                value,
                recipient,
            },
        );

        request_id
    }

    /// Vote yes on an open request. Approvers only, one vote per request.
    pub fn approve_request(
        env: Env,
        campaign_id: CampaignId,
        request_id: RequestId,
        approver: Address,
    ) {
        approver.require_auth();

        if !env
            .storage()
            .persistent()
            .has(&PersistentKey::Campaign(campaign_id))
        {
            panic_with_error!(&env, CrowdfundError::CampaignNotFound);
        }

        let mut request = get_request(&env, campaign_id, request_id);
        if request.complete {
            panic_with_error!(&env, CrowdfundError::RequestComplete);
        }

        let approver_key = PersistentKey::Approver(campaign_id, approver.clone());
        if !env.storage().persistent().get(&approver_key).unwrap_or(false) {
            panic_with_error!(&env, CrowdfundError::NotAuthorized);
        }

        let approval_key = PersistentKey::Approval(campaign_id, request_id, approver.clone());
        if env.storage().persistent().has(&approval_key) {
            panic_with_error!(&env, CrowdfundError::AlreadyVoted);
        }

        env.storage().persistent().set(&approval_key, &true);
        extend_persistent(&env, &approval_key);

        request.approval_count += 1;
        write_request(&env, campaign_id, &request);

        events::emit_request_approved(
            &env,
            events::RequestApprovedEvent {
                campaign_id,
                request_id,
                approver,
                approval_count: request.approval_count,
            },
        );
    }

    /// Pay out an open request once a strict majority of approvers has voted
    /// for it. Manager only. The sole transition to `complete` and the sole
    /// point where funds leave the campaign.
    pub fn finalize_request(
        env: Env,
        campaign_id: CampaignId,
        request_id: RequestId,
        caller: Address,
    ) {
        caller.require_auth();

        let mut record = get_campaign(&env, campaign_id);
        if caller != record.manager {
            panic_with_error!(&env, CrowdfundError::NotAuthorized);
        }

        let mut request = get_request(&env, campaign_id, request_id);
        if request.complete {
            panic_with_error!(&env, CrowdfundError::RequestComplete);
        }
        if !campaign::has_quorum(request.approval_count, record.approvers_count) {
            panic_with_error!(&env, CrowdfundError::QuorumNotReached);
        }
        if request.value > record.balance {
            panic_with_error!(&env, CrowdfundError::InsufficientFunds);
        }

        campaign::process_payout(&env, &request.recipient, request.value);
        record.balance = campaign::checked_debit(&env, record.balance, request.value);
        request.complete = true;

        write_campaign(&env, &record);
        write_request(&env, campaign_id, &request);

        events::emit_request_finalized(
            &env,
            events::RequestFinalizedEvent {
                campaign_id,
                request_id,
                value: request.value,
                recipient: request.recipient,
            },
        );
    }

    /// View functions
    pub fn get_campaign(env: Env, campaign_id: CampaignId) -> Campaign {
        get_campaign(&env, campaign_id)
    }

    pub fn get_manager(env: Env, campaign_id: CampaignId) -> Address {
        get_campaign(&env, campaign_id).manager
    }

    pub fn is_approver(env: Env, campaign_id: CampaignId, contributor: Address) -> bool {
        env.storage()
            .persistent()
            .get(&PersistentKey::Approver(campaign_id, contributor))
            .unwrap_or(false)
    }

    pub fn get_request(env: Env, campaign_id: CampaignId, request_id: RequestId) -> Request {
        get_request(&env, campaign_id, request_id)
    }

    pub fn has_approved(
        env: Env,
        campaign_id: CampaignId,
        request_id: RequestId,
        approver: Address,
    ) -> bool {
        env.storage()
            .persistent()
            .get(&PersistentKey::Approval(campaign_id, request_id, approver))
            .unwrap_or(false)
    }

    pub fn get_deployed_campaigns(env: Env) -> Vec<CampaignId> {
        env.storage()
            .instance()
            .get(&DataKey::Campaigns)
            .unwrap_or(Vec::new(&env))
    }

    pub fn campaign_count(env: Env) -> u32 {
        Self::get_deployed_campaigns(env).len()
    }

    pub fn get_token(env: Env) -> Address {
        campaign::read_token(&env)
    }
}

// Helper functions
fn extend_instance(e: &Env) {
    e.storage().instance().extend_ttl(TTL_INSTANCE, TTL_INSTANCE);
}

fn extend_persistent(e: &Env, key: &PersistentKey) {
    e.storage()
        .persistent()
        .extend_ttl(key, TTL_PERSISTENT, TTL_PERSISTENT);
}

fn get_campaign(e: &Env, campaign_id: CampaignId) -> Campaign {
    e.storage()
        .persistent()
        .get(&PersistentKey::Campaign(campaign_id))
        .unwrap_or_else(|| panic_with_error!(e, CrowdfundError::CampaignNotFound))
}

fn get_request(e: &Env, campaign_id: CampaignId, request_id: RequestId) -> Request {
    e.storage()
        .persistent()
        .get(&PersistentKey::Request(campaign_id, request_id))
        .unwrap_or_else(|| panic_with_error!(e, CrowdfundError::RequestNotFound))
}

fn write_campaign(e: &Env, record: &Campaign) {
    let key = PersistentKey::Campaign(record.id);
    e.storage().persistent().set(&key, record);
    extend_persistent(e, &key);
}

fn write_request(e: &Env, campaign_id: CampaignId, request: &Request) {
    let key = PersistentKey::Request(campaign_id, request.id);
    e.storage().persistent().set(&key, request);
    extend_persistent(e, &key);
}
