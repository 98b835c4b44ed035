//! Grant Manager contract bindings

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq)]
    interface IGrantManager {
        struct Grant {
            uint256 id;
            address creator;
            string title;
            string description;
            uint256 totalFunds;
            uint256 remainingFunds;
            uint256 maxApplicants;
            uint256 deadline;
            uint256 createdAt;
            uint8 status;
        }

        struct Application {
            address applicant;
            string proposal;
            uint256 submittedAt;
            uint8 status;
        }

        function grantCounter() external view returns (uint256);
        function getGrant(uint256 grantId) external view returns (Grant memory);
        function getApplicationCount(uint256 grantId) external view returns (uint256);
        function getApplication(uint256 grantId, uint256 index) external view returns (Application memory);

        event GrantCreated(uint256 indexed grantId, address indexed creator, uint256 totalFunds);
        event ApplicationSubmitted(uint256 indexed grantId, address indexed applicant, uint256 applicationIndex);
        event ApplicationReviewed(uint256 indexed grantId, uint256 indexed applicationIndex, bool approved);
        event GrantCancelled(uint256 indexed grantId);
    }
}
