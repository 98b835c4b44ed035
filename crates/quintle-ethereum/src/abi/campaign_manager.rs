//! Campaign (crowdfunding) Manager contract bindings

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq)]
    interface ICampaignManager {
        struct Campaign {
            uint256 id;
            address creator;
            string title;
            string description;
            uint256 goal;
            uint256 raised;
            uint256 deadline;
            uint256 createdAt;
            uint8 status;
        }

        struct Supporter {
            address supporter;
            uint256 amount;
            string message;
            uint256 contributedAt;
        }

        function campaignCounter() external view returns (uint256);
        function getCampaign(uint256 campaignId) external view returns (Campaign memory);
        function getSupporterCount(uint256 campaignId) external view returns (uint256);
        function getSupporter(uint256 campaignId, uint256 index) external view returns (Supporter memory);

        event CampaignCreated(uint256 indexed campaignId, address indexed creator, uint256 goal);
        event ContributionReceived(uint256 indexed campaignId, address indexed supporter, uint256 amount);
        event CampaignFinalized(uint256 indexed campaignId, bool successful);
        event CampaignCancelled(uint256 indexed campaignId);
    }
}
