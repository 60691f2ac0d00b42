use soroban_sdk::{contracterror, contracttype, Address, String};

pub type CampaignId = u64;
pub type RequestId = u32;

// Storage keys for instance data
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Token,
    Campaigns,
    NextCampaignId,
}

// Storage keys for persistent data
#[derive(Clone)]
#[contracttype]
pub enum PersistentKey {
    Campaign(CampaignId),
    Request(CampaignId, RequestId),
    Approver(CampaignId, Address),
    Approval(CampaignId, RequestId, Address),
}

/// A crowdfunding campaign. One manager, one pooled balance, a set of
/// approvers and an ordered sequence of spending requests.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Campaign {
    pub id: CampaignId,
    /// Set from the authenticated creator; never changes afterwards.
    pub manager: Address,
    /// Smallest contribution that grants approver membership.
    pub minimum_contribution: i128,
    /// Contributions received minus finalized payouts.
    pub balance: i128,
    /// Number of distinct contributors eligible to vote.
    pub approvers_count: u32,
    /// Requests ever created; request ids are 0..requests_count.
    pub requests_count: u32,
    pub created_at: u64,
}

/// A proposed payout from a campaign's balance. Mutated only by approval
/// votes and by finalization; `complete` is terminal.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Request {
    pub id: RequestId,
    pub description: String,
    /// Payout amount; checked against the campaign balance at finalization,
    /// not at creation.
    pub value: i128,
    pub recipient: Address,
    pub complete: bool,
    /// Number of distinct approvers who voted yes.
    pub approval_count: u32,
    pub created_at: u64,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CrowdfundError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidAmount = 3,
    ContributionTooSmall = 4,
    NotAuthorized = 5,
    CampaignNotFound = 6,
    RequestNotFound = 7,
    AlreadyVoted = 8,
    RequestComplete = 9,
    QuorumNotReached = 10,
    InsufficientFunds = 11,
    ArithmeticOverflow = 12,
}

// Constants
pub const TTL_INSTANCE: u32 = 17280 * 30; // 30 days
pub const TTL_PERSISTENT: u32 = 17280 * 90; // 90 days
